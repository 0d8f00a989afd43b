//! CPLEX LP-format rendering.

use std::collections::HashSet;
use std::fmt::Write as _;

use super::{ObjectiveSense, OptimizationModel};

const TERMS_PER_LINE: usize = 8;

/// Renders a model in CPLEX LP format.
///
/// Names are sanitized to the LP character set; collisions after
/// sanitizing get a numeric suffix.
///
/// # Example
///
/// ```
/// use ttbench_core::{write_lp, ConstraintSense, ObjectiveSense, OptimizationModel};
///
/// let mut model = OptimizationModel::new("demo", ObjectiveSense::Minimize);
/// let a = model.add_variable("x_E1_T1", 1.0);
/// let b = model.add_variable("x_E1_T2", 2.0);
/// model.add_constraint("assign_E1", vec![(a, 1.0), (b, 1.0)], ConstraintSense::Equal, 1.0);
///
/// let lp = write_lp(&model);
/// assert!(lp.contains("Minimize"));
/// assert!(lp.contains(" assign_E1: x_E1_T1 + x_E1_T2 = 1"));
/// assert!(lp.ends_with("End\n"));
/// ```
pub fn write_lp(model: &OptimizationModel) -> String {
    let var_names = unique_names(model.variables().iter().map(|v| v.name.as_str()));
    let row_names = unique_names(model.constraints().iter().map(|c| c.name.as_str()));

    let mut out = String::new();
    let _ = writeln!(out, "\\ Problem: {}", model.name());
    out.push_str(match model.sense() {
        ObjectiveSense::Minimize => "Minimize\n",
        ObjectiveSense::Maximize => "Maximize\n",
    });

    let objective: Vec<(usize, f64)> = model
        .variables()
        .iter()
        .enumerate()
        .filter(|(_, v)| v.cost != 0.0)
        .map(|(i, v)| (i, v.cost))
        .collect();
    out.push_str(" obj:");
    if objective.is_empty() {
        // LP needs at least one term.
        let _ = write!(out, " 0 {}", var_names.first().map_or("x", String::as_str));
    } else {
        write_terms(&mut out, &objective, &var_names, true);
    }
    out.push('\n');

    out.push_str("Subject To\n");
    for (row, constraint) in model.constraints().iter().enumerate() {
        let _ = write!(out, " {}:", row_names[row]);
        let terms: Vec<(usize, f64)> = constraint
            .terms
            .iter()
            .map(|&(var, c)| (var.index(), c))
            .collect();
        write_terms(&mut out, &terms, &var_names, false);
        let _ = writeln!(
            out,
            " {} {}",
            constraint.sense.symbol(),
            format_number(constraint.rhs)
        );
    }

    if !var_names.is_empty() {
        out.push_str("Binary\n");
        for chunk in var_names.chunks(TERMS_PER_LINE) {
            let _ = writeln!(out, " {}", chunk.join(" "));
        }
    }
    out.push_str("End\n");
    out
}

fn write_terms(out: &mut String, terms: &[(usize, f64)], names: &[String], show_unit: bool) {
    for (k, &(var, coefficient)) in terms.iter().enumerate() {
        if k > 0 && k % TERMS_PER_LINE == 0 {
            out.push_str("\n   ");
        }
        let sign = if coefficient < 0.0 { '-' } else { '+' };
        let magnitude = coefficient.abs();
        if k == 0 && sign == '+' {
            out.push(' ');
        } else {
            let _ = write!(out, " {} ", sign);
        }
        if magnitude != 1.0 || show_unit {
            let _ = write!(out, "{} ", format_number(magnitude));
        }
        out.push_str(&names[var]);
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn sanitize(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || "_.[]{}!#$%&()@~".contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty()
        || cleaned.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        || cleaned.eq_ignore_ascii_case("e")
    {
        cleaned.insert(0, '_');
    }
    cleaned.truncate(255);
    cleaned
}

fn unique_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .map(|name| {
            let base = sanitize(name);
            let mut candidate = base.clone();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConstraintSense;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("x_E 1_T-2"), "x_E_1_T_2");
        assert_eq!(sanitize("1abc"), "_1abc");
        assert_eq!(sanitize(""), "_");
        assert_eq!(sanitize("e"), "_e");
    }

    #[test]
    fn test_collisions_get_suffix() {
        let names = unique_names(["a b", "a_b", "a-b"].into_iter());
        assert_eq!(names, ["a_b", "a_b_1", "a_b_2"]);
    }

    #[test]
    fn test_maximize_with_negative_terms() {
        let mut model = OptimizationModel::new("mixed", ObjectiveSense::Maximize);
        let a = model.add_variable("a", 2.5);
        let b = model.add_variable("b", -1.0);
        model.add_constraint(
            "cap",
            vec![(a, 1.0), (b, -3.0)],
            ConstraintSense::LessEqual,
            4.0,
        );

        let lp = write_lp(&model);
        assert!(lp.contains("Maximize\n obj: 2.5 a - 1 b\n"));
        assert!(lp.contains(" cap: a - 3 b <= 4\n"));
        assert!(lp.contains("Binary\n a b\n"));
    }

    #[test]
    fn test_long_rows_wrap() {
        let mut model = OptimizationModel::new("wide", ObjectiveSense::Minimize);
        let terms: Vec<_> = (0..20)
            .map(|i| (model.add_variable(format!("v{}", i), 1.0), 1.0))
            .collect();
        model.add_constraint("row", terms, ConstraintSense::Equal, 1.0);

        let lp = write_lp(&model);
        assert!(lp.lines().all(|line| line.len() < 255));
        assert!(lp.contains("\n    + v8"));
    }
}
