//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` table.

use pagesmith_core::project::ProjectStatus;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Map a database status ID back to the enum.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( v if v == $val => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Row-level mirror of [`ProjectStatus`] for `project_statuses`.
    ProjectStatusId {
        Pending = 1,
        Ready = 2,
        Error = 3,
    }
}

define_status_enum! {
    /// Pipeline job lifecycle status.
    JobStatus {
        Queued = 1,
        Running = 2,
        Done = 3,
        Failed = 4,
    }
}

impl From<ProjectStatus> for ProjectStatusId {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Pending => Self::Pending,
            ProjectStatus::Ready => Self::Ready,
            ProjectStatus::Error => Self::Error,
        }
    }
}

impl From<ProjectStatusId> for ProjectStatus {
    fn from(status: ProjectStatusId) -> Self {
        match status {
            ProjectStatusId::Pending => Self::Pending,
            ProjectStatusId::Ready => Self::Ready,
            ProjectStatusId::Error => Self::Error,
        }
    }
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_seed_order() {
        assert_eq!(ProjectStatusId::Pending.id(), 1);
        assert_eq!(ProjectStatusId::Error.id(), 3);
        assert_eq!(JobStatus::Queued.id(), 1);
        assert_eq!(JobStatus::Failed.id(), 4);
    }

    #[test]
    fn from_id_round_trips() {
        for status in [JobStatus::Queued, JobStatus::Running, JobStatus::Done, JobStatus::Failed] {
            assert_eq!(JobStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(JobStatus::from_id(9), None);
        assert_eq!(ProjectStatusId::from_id(0), None);
    }

    #[test]
    fn project_status_mapping() {
        for &status in ProjectStatus::ALL {
            let id = ProjectStatusId::from(status);
            assert_eq!(ProjectStatus::from(id), status);
        }
    }
}
