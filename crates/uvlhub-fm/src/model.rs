//! In-memory representation of a feature model
//!
//! A [`FeatureModel`] is a rooted tree of [`Feature`]s plus a list of
//! cross-tree constraints. Quoted feature names keep their quotes; the quotes
//! are part of the identifier in every output format.

/// Relationship kind between a feature and the children listed under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Every child is selected whenever the parent is.
    Mandatory,
    /// Children may be freely selected when the parent is.
    Optional,
    /// At least one child must be selected when the parent is.
    Or,
    /// Exactly one child must be selected when the parent is.
    Alternative,
}

/// A block of children under one relationship keyword.
#[derive(Debug, Clone)]
pub struct Group {
    pub kind: GroupKind,
    pub children: Vec<Feature>,
}

/// One node of the feature tree.
#[derive(Debug, Clone)]
pub struct Feature {
    pub name: String,
    pub groups: Vec<Group>,
}

impl Feature {
    pub fn leaf(name: impl Into<String>) -> Self {
        Feature {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    /// Pre-order walk over this subtree.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Feature)) {
        visit(self);
        for group in &self.groups {
            for child in &group.children {
                child.walk(visit);
            }
        }
    }
}

/// A cross-tree constraint expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Implies(Box<Expr>, Box<Expr>),
    Equiv(Box<Expr>, Box<Expr>),
}

/// A literal in a CNF clause: the feature name and whether it is negated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lit {
    pub name: String,
    pub negated: bool,
}

impl Expr {
    /// Convert the expression to CNF clauses (conjunction of disjunctions).
    ///
    /// Implications and equivalences are expanded, the result is pushed into
    /// negation normal form, and disjunctions are distributed over
    /// conjunctions. Clause order is stable: left operands come first, which
    /// keeps rendered output deterministic.
    pub fn to_cnf_clauses(&self) -> Vec<Vec<Lit>> {
        cnf(&nnf(self, false))
    }
}

/// Negation-normal-form node: only And/Or over literals.
enum Nnf {
    Lit(Lit),
    And(Box<Nnf>, Box<Nnf>),
    Or(Box<Nnf>, Box<Nnf>),
}

fn nnf(expr: &Expr, negated: bool) -> Nnf {
    match expr {
        Expr::Var(name) => Nnf::Lit(Lit {
            name: name.clone(),
            negated,
        }),
        Expr::Not(inner) => nnf(inner, !negated),
        Expr::And(a, b) => {
            let (left, right) = (nnf(a, negated), nnf(b, negated));
            if negated {
                Nnf::Or(Box::new(left), Box::new(right))
            } else {
                Nnf::And(Box::new(left), Box::new(right))
            }
        },
        Expr::Or(a, b) => {
            let (left, right) = (nnf(a, negated), nnf(b, negated));
            if negated {
                Nnf::And(Box::new(left), Box::new(right))
            } else {
                Nnf::Or(Box::new(left), Box::new(right))
            }
        },
        Expr::Implies(a, b) => {
            // a => b  ===  !a | b
            let expanded = Expr::Or(Box::new(Expr::Not(a.clone())), b.clone());
            nnf(&expanded, negated)
        },
        Expr::Equiv(a, b) => {
            // a <=> b  ===  (a => b) & (b => a)
            let expanded = Expr::And(
                Box::new(Expr::Implies(a.clone(), b.clone())),
                Box::new(Expr::Implies(b.clone(), a.clone())),
            );
            nnf(&expanded, negated)
        },
    }
}

fn cnf(node: &Nnf) -> Vec<Vec<Lit>> {
    match node {
        Nnf::Lit(lit) => vec![vec![lit.clone()]],
        Nnf::And(a, b) => {
            let mut clauses = cnf(a);
            clauses.extend(cnf(b));
            clauses
        },
        Nnf::Or(a, b) => {
            let left = cnf(a);
            let right = cnf(b);
            let mut clauses = Vec::with_capacity(left.len() * right.len());
            for lc in &left {
                for rc in &right {
                    let mut clause = lc.clone();
                    clause.extend(rc.iter().cloned());
                    clauses.push(clause);
                }
            }
            clauses
        },
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Var(name) => f.write_str(name),
            Expr::Not(inner) => write!(f, "!{}", paren(inner)),
            Expr::And(a, b) => write!(f, "{} & {}", paren(a), paren(b)),
            Expr::Or(a, b) => write!(f, "{} | {}", paren(a), paren(b)),
            Expr::Implies(a, b) => write!(f, "{} => {}", paren(a), paren(b)),
            Expr::Equiv(a, b) => write!(f, "{} <=> {}", paren(a), paren(b)),
        }
    }
}

// Wraps non-atomic operands in parentheses instead of tracking precedence.
fn paren(expr: &Expr) -> String {
    match expr {
        Expr::Var(_) | Expr::Not(_) => expr.to_string(),
        _ => format!("({})", expr),
    }
}

/// A parsed feature model: the root feature plus cross-tree constraints.
#[derive(Debug, Clone)]
pub struct FeatureModel {
    pub root: Feature,
    pub constraints: Vec<Expr>,
}

impl FeatureModel {
    /// All feature names in pre-order, the canonical numbering for every
    /// writer.
    pub fn feature_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.root.walk(&mut |feature| names.push(feature.name.as_str()));
        names
    }

    pub fn feature_count(&self) -> usize {
        let mut count = 0;
        self.root.walk(&mut |_| count += 1);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    #[test]
    fn test_implication_to_cnf() {
        let expr = Expr::Implies(Box::new(var("A")), Box::new(var("B")));
        let clauses = expr.to_cnf_clauses();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0][0], Lit { name: "A".into(), negated: true });
        assert_eq!(clauses[0][1], Lit { name: "B".into(), negated: false });
    }

    #[test]
    fn test_disjunctive_antecedent_distributes() {
        // (A | B) => C  ===  (!A | C) & (!B | C)
        let expr = Expr::Implies(
            Box::new(Expr::Or(Box::new(var("A")), Box::new(var("B")))),
            Box::new(var("C")),
        );
        let clauses = expr.to_cnf_clauses();
        assert_eq!(clauses.len(), 2);
        assert!(clauses[0][0].negated && clauses[0][0].name == "A");
        assert!(clauses[1][0].negated && clauses[1][0].name == "B");
        assert!(!clauses[0][1].negated && clauses[0][1].name == "C");
    }

    #[test]
    fn test_equivalence_to_cnf() {
        let expr = Expr::Equiv(Box::new(var("A")), Box::new(var("B")));
        let clauses = expr.to_cnf_clauses();
        assert_eq!(clauses.len(), 2);
    }

    #[test]
    fn test_double_negation() {
        let expr = Expr::Not(Box::new(Expr::Not(Box::new(var("A")))));
        let clauses = expr.to_cnf_clauses();
        assert_eq!(clauses, vec![vec![Lit { name: "A".into(), negated: false }]]);
    }

    #[test]
    fn test_preorder_names() {
        let model = FeatureModel {
            root: Feature {
                name: "Root".into(),
                groups: vec![Group {
                    kind: GroupKind::Mandatory,
                    children: vec![Feature::leaf("A"), Feature::leaf("B")],
                }],
            },
            constraints: vec![],
        };
        assert_eq!(model.feature_names(), vec!["Root", "A", "B"]);
        assert_eq!(model.feature_count(), 3);
    }
}
