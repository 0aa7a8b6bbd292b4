//! Static content synthesis.
//!
//! Builds a complete nine-section document from phrasebooks. Tone picks the
//! register of headlines and calls to action; language picks the phrasebook.
//! Neither changes the document's shape.

use std::collections::BTreeMap;

use crate::project::{Language, Tone};
use crate::sections::{
    Badge, CompareSection, CompetitorMicrocopy, ComplianceSection, FinalCtaSection,
    FooterSection, HeroSection, HeroVisual, HowItWorksSection, Link, PricingSection,
    SectionsDocument, StoriesSection, Testimonial, TitledText, WhySection,
};

/// Placeholder filled with the destination country at render time.
pub const PLACEHOLDER_COUNTRY: &str = "{Country}";
/// Placeholder filled with the client name at render time.
pub const PLACEHOLDER_BANK: &str = "{Bank}";

const HERO_IMAGE_URL: &str = "https://images.pexels.com/photos/7414284/pexels-photo-7414284.jpeg";

const COUNTRIES: &[&str] = &[
    "Mexico",
    "Guatemala",
    "Colombia",
    "Dominican Republic",
    "Philippines",
    "India",
];

/// Tone-dependent line: (corporate, neutral, friendly).
type Toned = [&'static str; 3];

struct Phrasebook {
    hero_headline: Toned,
    hero_subheadline: &'static str,
    hero_cta: Toned,
    how_headline: &'static str,
    how_copy: &'static str,
    steps: [(&'static str, &'static str); 3],
    pricing_headline: &'static str,
    pricing_copy: &'static str,
    pricing_cta: &'static str,
    why_headline: Toned,
    bullets: [(&'static str, &'static str); 3],
    stories_headline: &'static str,
    testimonials: [(&'static str, &'static str, &'static str); 3],
    compliance_headline: &'static str,
    compliance_copy: &'static str,
    compliance_link: &'static str,
    compare_subcopy: &'static str,
    compare_disclaimer: &'static str,
    competitor_tooltip: &'static str,
    source_label: &'static str,
    final_headline: Toned,
    final_cta: Toned,
    final_subcopy: &'static str,
    footer: [&'static str; 4],
}

const EN: Phrasebook = Phrasebook {
    hero_headline: [
        "International transfers from {client}, built on trust",
        "Send money home with {client}",
        "Get money to your family fast with {client}",
    ],
    hero_subheadline: "Low fees, great rates and fast delivery to {Country}.",
    hero_cta: ["Start a transfer", "Send money now", "Send money now"],
    how_headline: "How it works",
    how_copy: "Three simple steps from your account to their pocket.",
    steps: [
        ("Create your transfer", "Choose the destination and the amount you want to send."),
        ("Pay securely", "Fund the transfer from your {client} account or card."),
        ("They receive it", "Your recipient gets the money by deposit or cash pickup."),
    ],
    pricing_headline: "Transparent pricing",
    pricing_copy: "See the fee and exchange rate before you send. No hidden charges.",
    pricing_cta: "See your rate",
    why_headline: [
        "Why clients choose {client}",
        "Why choose {client}",
        "Why people love {client}",
    ],
    bullets: [
        ("Great exchange rates", "Competitive rates that put more money in their hands."),
        ("Fast delivery", "Most transfers arrive within minutes."),
        ("Secure and regulated", "Your money is protected at every step."),
    ],
    stories_headline: "Stories from our customers",
    testimonials: [
        ("Sending money to my mother has never been this easy.", "Maria G.", "Houston, TX"),
        ("The rate was better than anywhere else I checked.", "Carlos R.", "Miami, FL"),
        ("My family got the money the same day.", "Ana P.", "Chicago, IL"),
    ],
    compliance_headline: "Regulated and secure",
    compliance_copy: "{client} is a licensed money transmitter and follows all applicable regulations.",
    compliance_link: "Learn about our licenses",
    compare_subcopy: "Compare what your recipient gets with {Bank} and other providers.",
    compare_disclaimer: "Rates and fees are estimates and may change at the time of transfer.",
    competitor_tooltip: "Published fee for a standard transfer.",
    source_label: "Provider pricing page",
    final_headline: [
        "Move money internationally with confidence",
        "Ready to send money?",
        "Your family is waiting",
    ],
    final_cta: ["Start a transfer", "Get started", "Send money now"],
    final_subcopy: "Join thousands of customers who trust {client}.",
    footer: ["Privacy", "Terms", "Licenses", "Contact"],
};

const ES: Phrasebook = Phrasebook {
    hero_headline: [
        "Transferencias internacionales de {client}, con la confianza que usted merece",
        "Envía dinero a casa con {client}",
        "¡Haz llegar tu dinero a tu familia rápido con {client}!",
    ],
    hero_subheadline: "Comisiones bajas, excelentes tipos de cambio y entrega rápida a {Country}.",
    hero_cta: ["Iniciar transferencia", "Enviar dinero", "¡Envía ya!"],
    how_headline: "Cómo funciona",
    how_copy: "Tres pasos sencillos desde tu cuenta hasta sus manos.",
    steps: [
        ("Crea tu envío", "Elige el destino y el monto que quieres enviar."),
        ("Paga de forma segura", "Paga con tu cuenta o tarjeta de {client}."),
        ("Lo reciben", "Tu destinatario recibe el dinero por depósito o en efectivo."),
    ],
    pricing_headline: "Precios transparentes",
    pricing_copy: "Conoce la comisión y el tipo de cambio antes de enviar. Sin cargos ocultos.",
    pricing_cta: "Ver mi tipo de cambio",
    why_headline: [
        "Por qué nuestros clientes eligen {client}",
        "Por qué elegir {client}",
        "Por qué a la gente le encanta {client}",
    ],
    bullets: [
        ("Excelentes tipos de cambio", "Tasas competitivas para que reciban más."),
        ("Entrega rápida", "La mayoría de los envíos llegan en minutos."),
        ("Seguro y regulado", "Tu dinero está protegido en cada paso."),
    ],
    stories_headline: "Historias de nuestros clientes",
    testimonials: [
        ("Enviarle dinero a mi mamá nunca fue tan fácil.", "María G.", "Houston, TX"),
        ("El tipo de cambio fue mejor que en cualquier otro lugar.", "Carlos R.", "Miami, FL"),
        ("Mi familia recibió el dinero el mismo día.", "Ana P.", "Chicago, IL"),
    ],
    compliance_headline: "Regulado y seguro",
    compliance_copy: "{client} es un transmisor de dinero autorizado y cumple con todas las regulaciones aplicables.",
    compliance_link: "Conoce nuestras licencias",
    compare_subcopy: "Compara lo que recibe tu destinatario con {Bank} y otros proveedores.",
    compare_disclaimer: "Las tasas y comisiones son estimadas y pueden cambiar al momento del envío.",
    competitor_tooltip: "Comisión publicada para un envío estándar.",
    source_label: "Página de precios del proveedor",
    final_headline: [
        "Envíe dinero al exterior con total confianza",
        "¿Listo para enviar dinero?",
        "¡Tu familia te está esperando!",
    ],
    final_cta: ["Iniciar transferencia", "Comenzar", "¡Envía ya!"],
    final_subcopy: "Únete a miles de clientes que confían en {client}.",
    footer: ["Privacidad", "Términos", "Licencias", "Contacto"],
};

const PT: Phrasebook = Phrasebook {
    hero_headline: [
        "Transferências internacionais da {client}, com a confiança que você merece",
        "Envie dinheiro para casa com a {client}",
        "Faça o dinheiro chegar rápido à sua família com a {client}!",
    ],
    hero_subheadline: "Tarifas baixas, ótimas taxas de câmbio e entrega rápida para {Country}.",
    hero_cta: ["Iniciar transferência", "Enviar dinheiro", "Envie agora!"],
    how_headline: "Como funciona",
    how_copy: "Três passos simples da sua conta até as mãos deles.",
    steps: [
        ("Crie sua transferência", "Escolha o destino e o valor que deseja enviar."),
        ("Pague com segurança", "Pague com sua conta ou cartão {client}."),
        ("Eles recebem", "Seu destinatário recebe por depósito ou retirada em dinheiro."),
    ],
    pricing_headline: "Preços transparentes",
    pricing_copy: "Veja a tarifa e o câmbio antes de enviar. Sem cobranças ocultas.",
    pricing_cta: "Ver minha cotação",
    why_headline: [
        "Por que nossos clientes escolhem a {client}",
        "Por que escolher a {client}",
        "Por que as pessoas amam a {client}",
    ],
    bullets: [
        ("Ótimas taxas de câmbio", "Taxas competitivas para que recebam mais."),
        ("Entrega rápida", "A maioria das transferências chega em minutos."),
        ("Seguro e regulamentado", "Seu dinheiro está protegido em cada etapa."),
    ],
    stories_headline: "Histórias dos nossos clientes",
    testimonials: [
        ("Enviar dinheiro para minha mãe nunca foi tão fácil.", "Maria G.", "Newark, NJ"),
        ("O câmbio foi melhor do que em qualquer outro lugar.", "Carlos R.", "Boston, MA"),
        ("Minha família recebeu o dinheiro no mesmo dia.", "Ana P.", "Orlando, FL"),
    ],
    compliance_headline: "Regulamentado e seguro",
    compliance_copy: "A {client} é uma instituição autorizada e segue todas as normas aplicáveis.",
    compliance_link: "Conheça nossas licenças",
    compare_subcopy: "Compare o que seu destinatário recebe com {Bank} e outros provedores.",
    compare_disclaimer: "Taxas e tarifas são estimativas e podem mudar no momento da transferência.",
    competitor_tooltip: "Tarifa publicada para uma transferência padrão.",
    source_label: "Página de preços do provedor",
    final_headline: [
        "Envie dinheiro ao exterior com total confiança",
        "Pronto para enviar dinheiro?",
        "Sua família está esperando!",
    ],
    final_cta: ["Iniciar transferência", "Começar", "Envie agora!"],
    final_subcopy: "Junte-se a milhares de clientes que confiam na {client}.",
    footer: ["Privacidade", "Termos", "Licenças", "Contato"],
};

const COMPETITORS: &[(&str, &str)] = &[
    ("remitly", "https://www.remitly.com/us/en/pricing"),
    ("westernUnion", "https://www.westernunion.com/us/en/price-estimator.html"),
    ("wise", "https://wise.com/us/pricing/"),
];

const FOOTER_HREFS: [&str; 4] = ["/privacy", "/terms", "/licenses", "/contact"];

fn phrasebook(language: Language) -> &'static Phrasebook {
    match language {
        Language::En => &EN,
        Language::Es => &ES,
        Language::Pt => &PT,
    }
}

fn toned(line: &Toned, tone: Tone) -> &'static str {
    match tone {
        Tone::Corporate => line[0],
        Tone::Neutral => line[1],
        Tone::Friendly => line[2],
    }
}

/// Produce a complete sections document for a client.
///
/// Every section is present and every required field is non-empty, for any
/// client name, tone and language.
pub fn synthesize(client_name: &str, tone: Tone, language: Language) -> SectionsDocument {
    let book = phrasebook(language);
    let client = client_name.trim();
    let fill = |text: &str| text.replace("{client}", client);
    let titled = |pairs: &[(&str, &str)]| -> Vec<TitledText> {
        pairs
            .iter()
            .map(|&(title, body)| TitledText {
                title: fill(title),
                body: fill(body),
            })
            .collect()
    };

    let microcopy: BTreeMap<String, CompetitorMicrocopy> = COMPETITORS
        .iter()
        .map(|(key, href)| {
            (
                (*key).to_string(),
                CompetitorMicrocopy {
                    tooltip: book.competitor_tooltip.to_string(),
                    sources: vec![Link {
                        label: book.source_label.to_string(),
                        href: (*href).to_string(),
                    }],
                },
            )
        })
        .collect();

    SectionsDocument {
        hero: Some(HeroSection {
            headline: fill(toned(&book.hero_headline, tone)),
            subheadline: book.hero_subheadline.to_string(),
            countries: COUNTRIES.iter().map(|c| (*c).to_string()).collect(),
            primary_cta_text: toned(&book.hero_cta, tone).to_string(),
            primary_cta_href: "#compare".to_string(),
            visual: HeroVisual {
                image_url: HERO_IMAGE_URL.to_string(),
                overlay_mock_url: None,
            },
        }),
        how_it_works: Some(HowItWorksSection {
            headline: book.how_headline.to_string(),
            steps: titled(&book.steps),
            copy: fill(book.how_copy),
        }),
        pricing: Some(PricingSection {
            headline: book.pricing_headline.to_string(),
            copy: fill(book.pricing_copy),
            cta_text: book.pricing_cta.to_string(),
            cta_href: "#compare".to_string(),
        }),
        why: Some(WhySection {
            headline: fill(toned(&book.why_headline, tone)),
            bullets: titled(&book.bullets),
            trust_badges: vec![
                Badge {
                    name: "FDIC".to_string(),
                    logo_url: None,
                },
                Badge {
                    name: "256-bit SSL".to_string(),
                    logo_url: None,
                },
            ],
        }),
        stories: Some(StoriesSection {
            headline: book.stories_headline.to_string(),
            testimonials: book
                .testimonials
                .iter()
                .map(|&(quote, name, location)| Testimonial {
                    quote: fill(quote),
                    name: name.to_string(),
                    location: location.to_string(),
                })
                .collect(),
            images: Vec::new(),
        }),
        compliance: Some(ComplianceSection {
            headline: book.compliance_headline.to_string(),
            copy: fill(book.compliance_copy),
            badges: vec![Badge {
                name: "NMLS".to_string(),
                logo_url: None,
            }],
            link_text: book.compliance_link.to_string(),
            link_href: "/licenses".to_string(),
        }),
        compare: Some(CompareSection {
            subcopy: book.compare_subcopy.to_string(),
            disclaimer: book.compare_disclaimer.to_string(),
            microcopy_by_competitor: microcopy,
        }),
        final_cta: Some(FinalCtaSection {
            headline: fill(toned(&book.final_headline, tone)),
            cta_text: toned(&book.final_cta, tone).to_string(),
            cta_href: "#compare".to_string(),
            subcopy: fill(book.final_subcopy),
        }),
        footer: Some(FooterSection {
            links: book
                .footer
                .iter()
                .zip(FOOTER_HREFS)
                .map(|(label, href)| Link {
                    label: (*label).to_string(),
                    href: href.to_string(),
                })
                .collect(),
        }),
    }
}
