//! SPLOT renderer
//!
//! Produces the SPLOT feature-tree text: an XML shell around a tab-indented
//! tree with `:r`/`:m`/`:o` markers, `:g [lo,hi]` group lines, and one
//! `C<n>:` line per CNF clause of the cross-tree constraints.

use crate::error::UvlError;
use crate::model::{Feature, FeatureModel, GroupKind};
use std::path::Path;

/// Render the model as a SPLOT document.
pub fn to_string(model: &FeatureModel) -> Result<String, UvlError> {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
    out.push_str(&format!("<feature_model name=\"{}\">\n", model.root.name));
    out.push_str("<feature_tree>\n");
    render_feature(&model.root, 0, ":r", &mut out);
    out.push_str("</feature_tree>\n");

    out.push_str("<constraints>\n");
    let mut counter = 0;
    for constraint in &model.constraints {
        for clause in constraint.to_cnf_clauses() {
            counter += 1;
            let rendered: Vec<String> = clause
                .iter()
                .map(|lit| {
                    if lit.negated {
                        format!("~{}", lit.name)
                    } else {
                        lit.name.clone()
                    }
                })
                .collect();
            out.push_str(&format!("\tC{}: {}\n", counter, rendered.join(" or ")));
        }
    }
    out.push_str("</constraints>\n");
    out.push_str("</feature_model>\n");
    Ok(out)
}

/// Render the model and write it to `path`.
pub fn write_to(model: &FeatureModel, path: impl AsRef<Path>) -> Result<(), UvlError> {
    std::fs::write(path, to_string(model)?)?;
    Ok(())
}

fn render_feature(feature: &Feature, depth: usize, marker: &str, out: &mut String) {
    out.push_str(&"\t".repeat(depth));
    out.push_str(&format!("{} {} ({})\n", marker, feature.name, feature.name));

    for group in &feature.groups {
        match group.kind {
            GroupKind::Mandatory => {
                for child in &group.children {
                    render_feature(child, depth + 1, ":m", out);
                }
            },
            GroupKind::Optional => {
                for child in &group.children {
                    render_feature(child, depth + 1, ":o", out);
                }
            },
            GroupKind::Alternative | GroupKind::Or => {
                let high = match group.kind {
                    GroupKind::Alternative => 1,
                    _ => group.children.len(),
                };
                out.push_str(&"\t".repeat(depth + 1));
                out.push_str(&format!(":g [1,{}]\n", high));
                for child in &group.children {
                    render_feature(child, depth + 2, ":", out);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Group;

    #[test]
    fn test_single_feature_shell() {
        let model = FeatureModel {
            root: Feature::leaf("Solo"),
            constraints: vec![],
        };
        let out = to_string(&model).unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n"));
        assert!(out.contains("<feature_model name=\"Solo\">\n"));
        assert!(out.contains(":r Solo (Solo)\n"));
        assert!(out.contains("<constraints>\n</constraints>\n"));
    }

    #[test]
    fn test_group_cardinalities() {
        let model = FeatureModel {
            root: Feature {
                name: "Root".into(),
                groups: vec![
                    Group {
                        kind: GroupKind::Alternative,
                        children: vec![Feature::leaf("A"), Feature::leaf("B")],
                    },
                    Group {
                        kind: GroupKind::Or,
                        children: vec![Feature::leaf("C"), Feature::leaf("D"), Feature::leaf("E")],
                    },
                ],
            },
            constraints: vec![],
        };
        let out = to_string(&model).unwrap();
        assert!(out.contains("\t:g [1,1]\n"));
        assert!(out.contains("\t:g [1,3]\n"));
        assert!(out.contains("\t\t: A (A)\n"));
    }
}
