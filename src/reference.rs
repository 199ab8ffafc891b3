//! Reference classification.
//!
//! Expressions list the symbolic references they read (`var.region`,
//! `aws_instance.web.id`, `module.net.vpc_id`, ...). This module turns such a
//! string into a [`Reference`] with a [`ReferenceKind`], a canonical target
//! address and a display color. Classification is best-effort: anything that
//! does not look like a reference to a graphable object resolves to `None`.

use serde::Serialize;

use crate::address;
use crate::overview::ObjectKind;

/// Leading segments of iterator and meta placeholders. These never name a
/// real object.
const PLACEHOLDER_ROOTS: &[&str] = &["each", "count", "self", "path"];

/// The workspace name pseudo-reference.
pub const WORKSPACE_REFERENCE: &str = "terraform.workspace";

/// What a reference points at, derived from its leading segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// `var.<name>`
    Variable,
    /// `output.<name>`
    Output,
    /// `module.<name>...`
    Module,
    /// `data.<type>.<name>...`
    Data,
    /// `local.<name>`
    Local,
    /// `<type>.<name>...`
    Resource,
}

/// A classified reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// Kind of object referenced.
    pub kind: ReferenceKind,
    /// Canonical module-relative target address.
    pub target: String,
}

impl ReferenceKind {
    /// Classifies a reference by its leading segment.
    #[must_use]
    pub fn classify(reference: &str) -> Self {
        match address::split_segments(reference).first().copied() {
            Some("var") => Self::Variable,
            Some("output") => Self::Output,
            Some("module") => Self::Module,
            Some("data") => Self::Data,
            Some("local") => Self::Local,
            _ => Self::Resource,
        }
    }

    /// Returns the object kind a reference of this kind targets.
    #[must_use]
    pub const fn object_kind(self) -> ObjectKind {
        match self {
            Self::Variable => ObjectKind::Variable,
            Self::Output => ObjectKind::Output,
            Self::Module => ObjectKind::Module,
            Self::Data => ObjectKind::Data,
            Self::Local => ObjectKind::Local,
            Self::Resource => ObjectKind::Resource,
        }
    }

    /// Returns the display color of the referenced object.
    #[must_use]
    pub const fn color(self) -> &'static str {
        self.object_kind().color()
    }
}

impl Reference {
    /// Resolves a raw reference into a graph edge target.
    ///
    /// Returns `None` for placeholders, malformed strings, and attribute
    /// accesses that would duplicate the edge to the object itself
    /// (`aws_instance.web.id`, `data.aws_ami.x.id`). Index accesses on
    /// variables, outputs and locals (`var.zones[0]`) target the object.
    #[must_use]
    pub fn resolve(raw: &str) -> Option<Self> {
        if !is_well_formed(raw) || is_placeholder(raw) {
            return None;
        }

        let kind = ReferenceKind::classify(raw);
        let segments = address::segment_count(raw);

        let target = match kind {
            ReferenceKind::Resource if segments != 2 => return None,
            ReferenceKind::Data if segments != 3 => return None,
            ReferenceKind::Resource | ReferenceKind::Data => raw.to_string(),
            _ if segments < 2 => return None,
            // Module outputs collapse onto the module instance.
            ReferenceKind::Module => address::leading_segments(raw, 2).to_string(),
            // Element accesses collapse onto the object itself.
            ReferenceKind::Variable | ReferenceKind::Output | ReferenceKind::Local => {
                address::strip_indexes(address::leading_segments(raw, 2))
            }
        };

        Some(Self { kind, target })
    }

    /// Returns the display color of the target.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        self.kind.color()
    }

    /// Returns true if this is the workspace name pseudo-reference.
    #[must_use]
    pub fn is_workspace(&self) -> bool {
        self.target == WORKSPACE_REFERENCE
    }
}

/// Returns true if the reference reads an iterator or meta object.
#[must_use]
pub fn is_placeholder(raw: &str) -> bool {
    address::split_segments(raw)
        .first()
        .is_some_and(|root| PLACEHOLDER_ROOTS.contains(root))
}

/// Whitespace is only allowed inside index keys (`y.b["my key"]`).
fn is_well_formed(raw: &str) -> bool {
    !raw.is_empty()
        && address::split_segments(raw).iter().all(|segment| {
            !segment.is_empty() && !address::strip_indexes(segment).contains(char::is_whitespace)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(ReferenceKind::classify("var.region"), ReferenceKind::Variable);
        assert_eq!(ReferenceKind::classify("output.id"), ReferenceKind::Output);
        assert_eq!(ReferenceKind::classify("module.net.id"), ReferenceKind::Module);
        assert_eq!(ReferenceKind::classify("data.aws_ami.x"), ReferenceKind::Data);
        assert_eq!(ReferenceKind::classify("local.tags"), ReferenceKind::Local);
        assert_eq!(ReferenceKind::classify("aws_vpc.main"), ReferenceKind::Resource);
        // Only the leading segment counts.
        assert_eq!(
            ReferenceKind::classify("aws_ssm_parameter.var.value"),
            ReferenceKind::Resource
        );
    }

    #[test]
    fn test_resource_attribute_access_is_skipped() {
        assert!(Reference::resolve("aws_instance.web.id").is_none());
        let reference = Reference::resolve("aws_instance.web").expect("resolves");
        assert_eq!(reference.kind, ReferenceKind::Resource);
        assert_eq!(reference.target, "aws_instance.web");
    }

    #[test]
    fn test_data_attribute_access_is_skipped() {
        assert!(Reference::resolve("data.aws_ami.x.id").is_none());
        assert!(Reference::resolve("data.aws_ami").is_none());
        let reference = Reference::resolve("data.aws_ami.x").expect("resolves");
        assert_eq!(reference.kind, ReferenceKind::Data);
        assert_eq!(reference.color(), "#dc477d");
    }

    #[test]
    fn test_placeholders_never_resolve() {
        assert!(Reference::resolve("each.value.x").is_none());
        assert!(Reference::resolve("each.key").is_none());
        assert!(Reference::resolve("count.index").is_none());
        assert!(Reference::resolve("self.private_ip").is_none());
        assert!(is_placeholder("path.module"));
    }

    #[test]
    fn test_module_outputs_collapse_onto_module() {
        let reference = Reference::resolve("module.net.vpc_id").expect("resolves");
        assert_eq!(reference.kind, ReferenceKind::Module);
        assert_eq!(reference.target, "module.net");
        assert!(Reference::resolve("module").is_none());
    }

    #[test]
    fn test_variable_color() {
        let reference = Reference::resolve("var.region").expect("resolves");
        assert_eq!(reference.target, "var.region");
        assert_eq!(reference.color(), "#1d7ada");
    }

    #[test]
    fn test_malformed_references_are_skipped() {
        assert!(Reference::resolve("").is_none());
        assert!(Reference::resolve("var..x").is_none());
        assert!(Reference::resolve("aws instance.web").is_none());
    }

    #[test]
    fn test_index_access_targets_the_object() {
        let variable = Reference::resolve("var.zones[0]").expect("resolves");
        assert_eq!(variable.target, "var.zones");

        let local = Reference::resolve(r#"local.m["k"]"#).expect("resolves");
        assert_eq!(local.kind, ReferenceKind::Local);
        assert_eq!(local.target, "local.m");

        let output = Reference::resolve("output.ids[1]").expect("resolves");
        assert_eq!(output.target, "output.ids");

        // Module instances are real nodes, so their index is kept.
        let module = Reference::resolve("module.net[0].vpc_id").expect("resolves");
        assert_eq!(module.target, "module.net[0]");
    }

    #[test]
    fn test_whitespace_inside_index_keys() {
        let reference = Reference::resolve(r#"y.b["my key"]"#).expect("resolves");
        assert_eq!(reference.kind, ReferenceKind::Resource);
        assert_eq!(reference.target, r#"y.b["my key"]"#);
        assert!(Reference::resolve(r#"y b["k"]"#).is_none());
    }

    #[test]
    fn test_workspace() {
        let reference = Reference::resolve(WORKSPACE_REFERENCE).expect("resolves");
        assert!(reference.is_workspace());
    }
}
