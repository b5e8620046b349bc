mod load;
mod records;

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;

pub use load::parse_entities;
pub use records::{EntityCollections, Event, Organization, Person, RecordId};

/// Where the entity collections come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Sample,
    File(PathBuf),
}

impl DataSource {
    pub fn load(&self) -> Result<EntityCollections> {
        let entities = match self {
            Self::Sample => load::sample_entities()?,
            Self::File(path) => load::read_entities(path)?,
        };
        tracing::info!(
            source = %self,
            people = entities.people.len(),
            organizations = entities.organizations.len(),
            events = entities.events.len(),
            "loaded entity collections"
        );
        Ok(entities)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sample => f.write_str("sample data"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_sample_data_parses() {
        let entities = DataSource::Sample.load().unwrap();
        assert_eq!(entities.people.len(), 5);
        assert_eq!(entities.organizations.len(), 4);
        assert_eq!(entities.events.len(), 3);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "people": [{{ "id": "p1", "name": "Grace" }}] }}"#
        )
        .unwrap();

        let entities = DataSource::File(file.path().to_path_buf()).load().unwrap();
        assert_eq!(entities.people.len(), 1);
        assert!(entities.organizations.is_empty());
    }

    #[test]
    fn test_load_rejects_non_object_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();

        let error = DataSource::File(file.path().to_path_buf()).load().unwrap_err();
        assert!(format!("{error:#}").contains("expected an object"));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let error = DataSource::File(PathBuf::from("/definitely/not/here.json"))
            .load()
            .unwrap_err();
        assert!(error.to_string().contains("failed to read entity data"));
    }
}
