//! In-memory [`ProjectStore`] with the same conditional semantics as the
//! Postgres store. Used by tests and by the API when no `DATABASE_URL` is
//! configured.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use pagesmith_core::project::{BrandStyle, NewProject, Page, Project, ProjectStatus};
use pagesmith_core::sections::SectionsDocument;
use pagesmith_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use crate::models::job::PipelineJob;
use crate::models::status::JobStatus;
use crate::store::{ProjectStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    next_project_id: DbId,
    next_job_id: DbId,
    projects: BTreeMap<DbId, Project>,
    brand_styles: HashMap<DbId, BrandStyle>,
    pages: HashMap<DbId, Page>,
    /// Keyed by job id, so iteration order is enqueue order.
    jobs: BTreeMap<DbId, PipelineJob>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn update_job(inner: &mut Inner, job_id: DbId, f: impl FnOnce(&mut PipelineJob)) {
    if let Some(job) = inner.jobs.get_mut(&job_id) {
        f(job);
        job.updated_at = Utc::now();
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list_slugs(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.projects.values().map(|p| p.slug.clone()).collect())
    }

    async fn create_project(&self, input: &NewProject) -> Result<Project, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.projects.values().any(|p| p.slug == input.slug) {
            return Err(StoreError::Conflict(format!(
                "slug '{}' is already taken",
                input.slug
            )));
        }
        inner.next_project_id += 1;
        let now = Utc::now();
        let project = Project {
            id: inner.next_project_id,
            slug: input.slug.clone(),
            client_name: input.client_name.clone(),
            source_url: input.source_url.clone(),
            template_key: input.template_key.clone(),
            tone: input.tone,
            locale: input.locale,
            status: ProjectStatus::Pending,
            error_message: None,
            expires_at: input.expires_at,
            created_at: now,
            updated_at: now,
        };
        inner.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, StoreError> {
        Ok(self.inner.read().await.projects.get(&id).cloned())
    }

    async fn find_project_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.projects.values().find(|p| p.slug == slug).cloned())
    }

    async fn find_brand_style(&self, project_id: DbId) -> Result<Option<BrandStyle>, StoreError> {
        Ok(self.inner.read().await.brand_styles.get(&project_id).cloned())
    }

    async fn save_brand_style(
        &self,
        project_id: DbId,
        style: &BrandStyle,
    ) -> Result<BrandStyle, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.projects.contains_key(&project_id) {
            return Err(StoreError::Conflict(format!("project {project_id} does not exist")));
        }
        inner.brand_styles.insert(project_id, style.clone());
        Ok(style.clone())
    }

    async fn find_page(&self, project_id: DbId) -> Result<Option<Page>, StoreError> {
        Ok(self.inner.read().await.pages.get(&project_id).cloned())
    }

    async fn save_page(
        &self,
        project_id: DbId,
        sections: &SectionsDocument,
    ) -> Result<Page, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.projects.contains_key(&project_id) {
            return Err(StoreError::Conflict(format!("project {project_id} does not exist")));
        }
        let now = Utc::now();
        let created_at = inner.pages.get(&project_id).map_or(now, |p| p.created_at);
        let page = Page {
            project_id,
            sections: sections.clone(),
            created_at,
            updated_at: now,
        };
        inner.pages.insert(project_id, page.clone());
        Ok(page)
    }

    async fn replace_sections(
        &self,
        project_id: DbId,
        sections: &SectionsDocument,
    ) -> Result<Option<Page>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.pages.get_mut(&project_id).map(|page| {
            page.sections = sections.clone();
            page.updated_at = Utc::now();
            page.clone()
        }))
    }

    async fn mark_ready(&self, id: DbId, template_key: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let has_page = inner.pages.contains_key(&id);
        let Some(project) = inner.projects.get_mut(&id) else {
            return Ok(false);
        };
        if !has_page || !project.status.can_transition_to(ProjectStatus::Ready) {
            return Ok(false);
        }
        project.status = ProjectStatus::Ready;
        project.template_key = template_key.to_string();
        project.error_message = None;
        project.updated_at = Utc::now();
        Ok(true)
    }

    async fn mark_error(&self, id: DbId, message: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(project) = inner.projects.get_mut(&id) else {
            return Ok(false);
        };
        if !project.status.can_transition_to(ProjectStatus::Error) {
            return Ok(false);
        }
        project.status = ProjectStatus::Error;
        project.error_message = Some(message.to_string());
        project.updated_at = Utc::now();
        Ok(true)
    }

    async fn enqueue_job(&self, project_id: DbId) -> Result<PipelineJob, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.jobs.values().find(|j| j.project_id == project_id) {
            return Ok(existing.clone());
        }
        if !inner.projects.contains_key(&project_id) {
            return Err(StoreError::Conflict(format!("project {project_id} does not exist")));
        }
        inner.next_job_id += 1;
        let now = Utc::now();
        let job = PipelineJob {
            id: inner.next_job_id,
            project_id,
            status_id: JobStatus::Queued.id(),
            attempts: 0,
            worker_id: None,
            last_error: None,
            claimed_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        inner.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn claim_next_job(&self, worker_id: &str) -> Result<Option<PipelineJob>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(job) = inner
            .jobs
            .values_mut()
            .find(|j| j.status_id == JobStatus::Queued.id())
        else {
            return Ok(None);
        };
        let now = Utc::now();
        job.status_id = JobStatus::Running.id();
        job.worker_id = Some(worker_id.to_string());
        job.claimed_at = Some(now);
        job.attempts += 1;
        job.updated_at = now;
        Ok(Some(job.clone()))
    }

    async fn complete_job(&self, job_id: DbId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        update_job(&mut inner, job_id, |job| {
            job.status_id = JobStatus::Done.id();
            job.completed_at = Some(Utc::now());
            job.last_error = None;
        });
        Ok(())
    }

    async fn fail_job(&self, job_id: DbId, error: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        update_job(&mut inner, job_id, |job| {
            job.status_id = JobStatus::Failed.id();
            job.completed_at = Some(Utc::now());
            job.last_error = Some(error.to_string());
        });
        Ok(())
    }

    async fn requeue_stale_jobs(&self, claimed_before: Timestamp) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let mut count = 0;
        for job in inner.jobs.values_mut() {
            let stale = job.status_id == JobStatus::Running.id()
                && job.claimed_at.is_some_and(|at| at < claimed_before);
            if stale {
                job.status_id = JobStatus::Queued.id();
                job.worker_id = None;
                job.claimed_at = None;
                job.updated_at = Utc::now();
                count += 1;
            }
        }
        Ok(count)
    }

    async fn find_job(&self, project_id: DbId) -> Result<Option<PipelineJob>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.jobs.values().find(|j| j.project_id == project_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Duration;
    use pagesmith_core::project::{Locale, Tone};

    use super::*;

    fn new_project(slug: &str) -> NewProject {
        NewProject {
            slug: slug.to_string(),
            client_name: "Acme Bank".to_string(),
            source_url: "https://example-bank.com".to_string(),
            template_key: "auto".to_string(),
            tone: Tone::Neutral,
            locale: Locale::Auto,
            expires_at: None,
        }
    }

    // -- projects --

    #[tokio::test]
    async fn create_starts_pending_with_unique_ids() {
        let store = MemoryStore::new();
        let a = store.create_project(&new_project("acme-bank")).await.unwrap();
        let b = store.create_project(&new_project("acme-bank-2")).await.unwrap();
        assert_eq!(a.status, ProjectStatus::Pending);
        assert_ne!(a.id, b.id);
        assert_eq!(
            store.find_project_by_slug("acme-bank-2").await.unwrap().unwrap().id,
            b.id
        );
        let mut slugs = store.list_slugs().await.unwrap();
        slugs.sort();
        assert_eq!(slugs, vec!["acme-bank", "acme-bank-2"]);
    }

    #[tokio::test]
    async fn duplicate_slug_conflicts() {
        let store = MemoryStore::new();
        store.create_project(&new_project("acme-bank")).await.unwrap();
        assert_matches!(
            store.create_project(&new_project("acme-bank")).await,
            Err(StoreError::Conflict(_))
        );
    }

    #[tokio::test]
    async fn mark_ready_requires_page() {
        let store = MemoryStore::new();
        let p = store.create_project(&new_project("acme-bank")).await.unwrap();
        assert!(!store.mark_ready(p.id, "classic").await.unwrap());

        store.save_page(p.id, &SectionsDocument::default()).await.unwrap();
        assert!(store.mark_ready(p.id, "classic").await.unwrap());

        let p = store.find_project(p.id).await.unwrap().unwrap();
        assert_eq!(p.status, ProjectStatus::Ready);
        assert_eq!(p.template_key, "classic");
    }

    #[tokio::test]
    async fn terminal_status_is_never_overwritten() {
        let store = MemoryStore::new();
        let p = store.create_project(&new_project("acme-bank")).await.unwrap();
        assert!(store.mark_error(p.id, "boom").await.unwrap());

        store.save_page(p.id, &SectionsDocument::default()).await.unwrap();
        assert!(!store.mark_ready(p.id, "classic").await.unwrap());
        assert!(!store.mark_error(p.id, "again").await.unwrap());

        let p = store.find_project(p.id).await.unwrap().unwrap();
        assert_eq!(p.status, ProjectStatus::Error);
        assert_eq!(p.error_message.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn missing_project_transitions_report_false() {
        let store = MemoryStore::new();
        assert!(!store.mark_ready(42, "classic").await.unwrap());
        assert!(!store.mark_error(42, "x").await.unwrap());
        assert!(store.find_detail(42).await.unwrap().is_none());
    }

    // -- pages --

    #[tokio::test]
    async fn replace_sections_needs_existing_page() {
        let store = MemoryStore::new();
        let p = store.create_project(&new_project("acme-bank")).await.unwrap();
        assert!(store
            .replace_sections(p.id, &SectionsDocument::default())
            .await
            .unwrap()
            .is_none());

        let first = store.save_page(p.id, &SectionsDocument::default()).await.unwrap();
        let replaced = store
            .replace_sections(p.id, &SectionsDocument::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.created_at, first.created_at);
        assert!(replaced.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn detail_bundles_owned_entities() {
        let store = MemoryStore::new();
        let p = store.create_project(&new_project("acme-bank")).await.unwrap();
        let style = BrandStyle {
            primary_color: Some("#003366".into()),
            ..Default::default()
        };
        store.save_brand_style(p.id, &style).await.unwrap();

        let detail = store.find_detail(p.id).await.unwrap().unwrap();
        assert_eq!(detail.project.id, p.id);
        assert_eq!(detail.brand_style, Some(style));
        assert!(detail.page.is_none());
    }

    // -- jobs --

    #[tokio::test]
    async fn jobs_claim_in_enqueue_order_once() {
        let store = MemoryStore::new();
        let a = store.create_project(&new_project("a")).await.unwrap();
        let b = store.create_project(&new_project("b")).await.unwrap();
        store.enqueue_job(a.id).await.unwrap();
        store.enqueue_job(b.id).await.unwrap();

        let first = store.claim_next_job("w1").await.unwrap().unwrap();
        let second = store.claim_next_job("w2").await.unwrap().unwrap();
        assert_eq!(first.project_id, a.id);
        assert_eq!(second.project_id, b.id);
        assert_eq!(first.status(), Some(JobStatus::Running));
        assert_eq!(first.attempts, 1);
        assert!(store.claim_next_job("w3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn enqueue_is_idempotent_per_project() {
        let store = MemoryStore::new();
        let p = store.create_project(&new_project("a")).await.unwrap();
        let first = store.enqueue_job(p.id).await.unwrap();
        let again = store.enqueue_job(p.id).await.unwrap();
        assert_eq!(first.id, again.id);
    }

    #[tokio::test]
    async fn complete_and_fail_are_recorded() {
        let store = MemoryStore::new();
        let a = store.create_project(&new_project("a")).await.unwrap();
        let b = store.create_project(&new_project("b")).await.unwrap();
        store.enqueue_job(a.id).await.unwrap();
        store.enqueue_job(b.id).await.unwrap();
        let ja = store.claim_next_job("w").await.unwrap().unwrap();
        let jb = store.claim_next_job("w").await.unwrap().unwrap();

        store.complete_job(ja.id).await.unwrap();
        store.fail_job(jb.id, "panicked").await.unwrap();

        let ja = store.find_job(a.id).await.unwrap().unwrap();
        let jb = store.find_job(b.id).await.unwrap().unwrap();
        assert_eq!(ja.status(), Some(JobStatus::Done));
        assert_eq!(jb.status(), Some(JobStatus::Failed));
        assert_eq!(jb.last_error.as_deref(), Some("panicked"));
    }

    #[tokio::test]
    async fn stale_running_jobs_are_requeued() {
        let store = MemoryStore::new();
        let p = store.create_project(&new_project("a")).await.unwrap();
        store.enqueue_job(p.id).await.unwrap();
        store.claim_next_job("dead-worker").await.unwrap().unwrap();

        let past = Utc::now() - Duration::minutes(5);
        assert_eq!(store.requeue_stale_jobs(past).await.unwrap(), 0);

        let future = Utc::now() + Duration::seconds(1);
        assert_eq!(store.requeue_stale_jobs(future).await.unwrap(), 1);

        let reclaimed = store.claim_next_job("w2").await.unwrap().unwrap();
        assert_eq!(reclaimed.attempts, 2);
        assert_eq!(reclaimed.worker_id.as_deref(), Some("w2"));
    }
}
