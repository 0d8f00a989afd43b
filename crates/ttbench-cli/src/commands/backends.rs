//! Backends command - list registered solver backends

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use ttbench::available_backends;

#[derive(Parser, Debug)]
pub struct BackendsCmd {}

impl BackendsCmd {
    pub fn execute(&self, out: &mut impl Write) -> Result<()> {
        let width = available_backends()
            .iter()
            .map(|kind| kind.id().len())
            .max()
            .unwrap_or(0);
        for kind in available_backends() {
            writeln!(out, "{:<width$}  {}", kind.id(), kind.description())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_backend() {
        let mut out = Vec::new();
        BackendsCmd {}.execute(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), available_backends().len());
        assert!(lines[0].starts_with("decomposition"));
        assert!(lines[1].starts_with("branch-and-bound"));
    }
}
