//! DIMACS/CNF renderer
//!
//! Variables are numbered by a pre-order walk of the feature tree starting at
//! 1. The output begins with a `p cnf <vars> <clauses>` header, followed by
//! one `c <index> <name>` comment line per feature, followed by the clauses.
//! Tree clauses come first in walk order, then the cross-tree constraints in
//! document order.

use crate::error::UvlError;
use crate::model::{Feature, FeatureModel, GroupKind};
use std::collections::HashMap;
use std::path::Path;

/// Render the model as a DIMACS document.
pub fn to_string(model: &FeatureModel) -> Result<String, UvlError> {
    let names = model.feature_names();
    let index: HashMap<&str, i32> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, i as i32 + 1))
        .collect();

    // The root is always selected.
    let mut clauses: Vec<Vec<i32>> = vec![vec![index[model.root.name.as_str()]]];
    emit_tree(&model.root, &index, &mut clauses);

    for constraint in &model.constraints {
        for clause in constraint.to_cnf_clauses() {
            let mut lits = Vec::with_capacity(clause.len());
            for lit in clause {
                let var = *index
                    .get(lit.name.as_str())
                    .ok_or_else(|| UvlError::UnknownFeature(lit.name.clone()))?;
                lits.push(if lit.negated { -var } else { var });
            }
            clauses.push(lits);
        }
    }

    let mut out = format!("p cnf {} {}\n", names.len(), clauses.len());
    for (i, name) in names.iter().enumerate() {
        out.push_str(&format!("c {} {}\n", i + 1, name));
    }
    for clause in &clauses {
        for lit in clause {
            out.push_str(&lit.to_string());
            out.push(' ');
        }
        out.push_str("0\n");
    }
    Ok(out)
}

/// Render the model and write it to `path`.
pub fn write_to(model: &FeatureModel, path: impl AsRef<Path>) -> Result<(), UvlError> {
    std::fs::write(path, to_string(model)?)?;
    Ok(())
}

fn emit_tree(feature: &Feature, index: &HashMap<&str, i32>, clauses: &mut Vec<Vec<i32>>) {
    let parent = index[feature.name.as_str()];
    for group in &feature.groups {
        match group.kind {
            GroupKind::Mandatory => {
                for child in &group.children {
                    let c = index[child.name.as_str()];
                    clauses.push(vec![-parent, c]);
                    clauses.push(vec![-c, parent]);
                    emit_tree(child, index, clauses);
                }
            },
            GroupKind::Optional => {
                for child in &group.children {
                    let c = index[child.name.as_str()];
                    clauses.push(vec![-c, parent]);
                    emit_tree(child, index, clauses);
                }
            },
            GroupKind::Alternative => {
                let vars: Vec<i32> = group
                    .children
                    .iter()
                    .map(|child| index[child.name.as_str()])
                    .collect();
                let mut at_least_one = vec![-parent];
                at_least_one.extend(&vars);
                clauses.push(at_least_one);
                for (i, &a) in vars.iter().enumerate() {
                    for &b in &vars[i + 1..] {
                        clauses.push(vec![-a, -b]);
                    }
                }
                for &v in &vars {
                    clauses.push(vec![-v, parent]);
                }
                for child in &group.children {
                    emit_tree(child, index, clauses);
                }
            },
            GroupKind::Or => {
                let vars: Vec<i32> = group
                    .children
                    .iter()
                    .map(|child| index[child.name.as_str()])
                    .collect();
                let mut at_least_one = vec![-parent];
                at_least_one.extend(&vars);
                clauses.push(at_least_one);
                for &v in &vars {
                    clauses.push(vec![-v, parent]);
                }
                for child in &group.children {
                    emit_tree(child, index, clauses);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Expr, Group};

    #[test]
    fn test_single_feature() {
        let model = FeatureModel {
            root: Feature::leaf("Root"),
            constraints: vec![],
        };
        assert_eq!(to_string(&model).unwrap(), "p cnf 1 1\nc 1 Root\n1 0\n");
    }

    #[test]
    fn test_unknown_constraint_feature() {
        let model = FeatureModel {
            root: Feature::leaf("Root"),
            constraints: vec![Expr::Var("Ghost".to_string())],
        };
        match to_string(&model) {
            Err(UvlError::UnknownFeature(name)) => assert_eq!(name, "Ghost"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_alternative_pairwise_exclusion() {
        let model = FeatureModel {
            root: Feature {
                name: "Root".into(),
                groups: vec![Group {
                    kind: GroupKind::Alternative,
                    children: vec![Feature::leaf("A"), Feature::leaf("B"), Feature::leaf("C")],
                }],
            },
            constraints: vec![],
        };
        let out = to_string(&model).unwrap();
        assert!(out.starts_with("p cnf 4 8\n"));
        assert!(out.contains("-2 -3 0\n"));
        assert!(out.contains("-2 -4 0\n"));
        assert!(out.contains("-3 -4 0\n"));
    }
}
