// process-wide registration of the temporal column classes

use std::sync::OnceLock;

use crate::parse::TemporalKind;

/// Descriptor for one registered column class: the name reported by
/// `inspect` and the unit of its numeric encoding.
#[derive(Debug)]
pub struct ColumnClass {
    name: &'static str,
    kind: TemporalKind,
    unit: &'static str,
}

impl ColumnClass {
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn kind(&self) -> TemporalKind {
        self.kind
    }
    pub fn unit(&self) -> &'static str {
        self.unit
    }
}

#[derive(Debug)]
pub struct ClassRegistry {
    classes: Vec<ColumnClass>,
}

impl ClassRegistry {
    fn bootstrap() -> Self {
        Self {
            classes: vec![
                ColumnClass {
                    name: "chronovec_date",
                    kind: TemporalKind::Date,
                    unit: "days since 1970-01-01",
                },
                ColumnClass {
                    name: "chronovec_dttm",
                    kind: TemporalKind::DateTime,
                    unit: "seconds since 1970-01-01",
                },
            ],
        }
    }
    pub fn class_for(&self, kind: TemporalKind) -> &ColumnClass {
        // both kinds are registered at bootstrap, so the lookup cannot miss
        self.classes
            .iter()
            .find(|class| class.kind == kind)
            .unwrap()
    }
    pub fn len(&self) -> usize {
        self.classes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

static REGISTRY: OnceLock<ClassRegistry> = OnceLock::new();

/// The registry, built on first use. Later calls observe the same instance;
/// there is no re-registration path.
pub fn registry() -> &'static ClassRegistry {
    REGISTRY.get_or_init(ClassRegistry::bootstrap)
}
