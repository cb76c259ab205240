//! Glencoe (JSON) renderer
//!
//! Serializes the feature tree as nested JSON objects. Constraints are
//! rendered as their textual expression form.

use crate::error::UvlError;
use crate::model::{Feature, FeatureModel, GroupKind};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct Document<'a> {
    version: &'static str,
    root: Node<'a>,
    constraints: Vec<String>,
}

#[derive(Serialize)]
struct Node<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    groups: Vec<GroupNode<'a>>,
}

#[derive(Serialize)]
struct GroupNode<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    children: Vec<Node<'a>>,
}

fn node(feature: &Feature) -> Node<'_> {
    Node {
        id: &feature.name,
        groups: feature
            .groups
            .iter()
            .map(|group| GroupNode {
                kind: match group.kind {
                    GroupKind::Mandatory => "mandatory",
                    GroupKind::Optional => "optional",
                    GroupKind::Or => "or",
                    GroupKind::Alternative => "alternative",
                },
                children: group.children.iter().map(node).collect(),
            })
            .collect(),
    }
}

/// Render the model as a Glencoe JSON document.
pub fn to_string(model: &FeatureModel) -> Result<String, UvlError> {
    let document = Document {
        version: "1.0",
        root: node(&model.root),
        constraints: model.constraints.iter().map(|c| c.to_string()).collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Render the model and write it to `path`.
pub fn write_to(model: &FeatureModel, path: impl AsRef<Path>) -> Result<(), UvlError> {
    std::fs::write(path, to_string(model)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Expr, Group};

    #[test]
    fn test_output_is_valid_json() {
        let model = FeatureModel {
            root: Feature {
                name: "Root".into(),
                groups: vec![Group {
                    kind: GroupKind::Optional,
                    children: vec![Feature::leaf("A")],
                }],
            },
            constraints: vec![Expr::Implies(
                Box::new(Expr::Var("A".into())),
                Box::new(Expr::Var("Root".into())),
            )],
        };
        let out = to_string(&model).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["root"]["id"], "Root");
        assert_eq!(value["root"]["groups"][0]["type"], "optional");
        assert_eq!(value["constraints"][0], "A => Root");
    }

    #[test]
    fn test_leaf_omits_groups() {
        let model = FeatureModel {
            root: Feature::leaf("Solo"),
            constraints: vec![],
        };
        let value: serde_json::Value =
            serde_json::from_str(&to_string(&model).unwrap()).unwrap();
        assert!(value["root"].get("groups").is_none());
    }
}
