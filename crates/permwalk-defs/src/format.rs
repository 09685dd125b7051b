//! Generator-set definition envelope.

use anyhow::{bail, ensure, Result};
use permwalk_core::{GeneratorTable, Token, Validation};
use serde::{Deserialize, Serialize};

/// Current definition format version.
pub const GRAPH_DEF_VERSION: u16 = 1;

/// A set of generators plus the state walks start from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphDef {
    /// Format/version tag for forward-compat.
    pub version: u16,
    /// Human-readable name, e.g. `lrx-8`.
    pub name: String,
    /// Generator rows, each a permutation of `[0, central_state.len())`.
    pub generators: Vec<Vec<Token>>,
    /// Optional per-generator labels, same length as `generators`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator_names: Option<Vec<String>>,
    /// Central state; its length fixes the state width.
    pub central_state: Vec<Token>,
    /// Optional metadata (family, parameters, provenance).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl GraphDef {
    /// Width of every state and generator.
    #[inline]
    #[must_use]
    pub fn state_size(&self) -> usize {
        self.central_state.len()
    }

    /// Number of generators.
    #[inline]
    #[must_use]
    pub fn num_gens(&self) -> usize {
        self.generators.len()
    }

    /// Structural checks that do not depend on row contents.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.version == GRAPH_DEF_VERSION,
            "unsupported definition version {} (expected {GRAPH_DEF_VERSION})",
            self.version
        );
        ensure!(!self.central_state.is_empty(), "definition `{}` has an empty central state", self.name);
        if let Some(names) = &self.generator_names {
            ensure!(
                names.len() == self.generators.len(),
                "definition `{}` names {} generators but defines {}",
                self.name,
                names.len(),
                self.generators.len()
            );
        }
        Ok(())
    }

    /// Build the executor's table. Width comes from the central state, so a
    /// definition with no generators still has a well-defined width.
    pub fn table(&self, validation: Validation) -> Result<GeneratorTable> {
        self.validate()?;
        let width = self.state_size();
        let mut flat = Vec::with_capacity(self.num_gens() * width);
        for (g, row) in self.generators.iter().enumerate() {
            if row.len() != width {
                bail!(
                    "generator {g} of `{}` has {} entries, central state has {width}",
                    self.name,
                    row.len()
                );
            }
            flat.extend_from_slice(row);
        }
        Ok(GeneratorTable::from_flat(&flat, self.num_gens(), width, validation)?)
    }

    /// Label of generator `g`, falling back to its index.
    #[must_use]
    pub fn generator_name(&self, g: usize) -> String {
        self.generator_names
            .as_ref()
            .and_then(|names| names.get(g).cloned())
            .unwrap_or_else(|| format!("g{g}"))
    }

    /// Definition of the inverted graph: every generator replaced by its inverse.
    pub fn inverted(&self) -> Result<Self> {
        let inv = self.table(Validation::Permutation)?.inverted();
        Ok(Self {
            version: self.version,
            name: format!("{}-inv", self.name),
            generators: inv.to_rows(),
            generator_names: self
                .generator_names
                .as_ref()
                .map(|names| names.iter().map(|n| format!("{n}'")).collect()),
            central_state: self.central_state.clone(),
            meta: self.meta.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def() -> GraphDef {
        GraphDef {
            version: GRAPH_DEF_VERSION,
            name: "c3".into(),
            generators: vec![vec![1, 2, 0]],
            generator_names: Some(vec!["r".into()]),
            central_state: vec![0, 1, 2],
            meta: None,
        }
    }

    #[test]
    fn table_uses_central_width() {
        let t = def().table(Validation::Permutation).unwrap();
        assert_eq!((t.num_gens(), t.state_size()), (1, 3));

        let empty = GraphDef { generators: vec![], generator_names: None, ..def() };
        let t = empty.table(Validation::Permutation).unwrap();
        assert_eq!((t.num_gens(), t.state_size()), (0, 3));
    }

    #[test]
    fn validate_rejects_bad_envelopes() {
        assert!(GraphDef { version: 9, ..def() }.validate().is_err());
        assert!(GraphDef { generator_names: Some(vec![]), ..def() }.validate().is_err());
        assert!(GraphDef { generators: vec![vec![0, 1]], generator_names: None, ..def() }
            .table(Validation::Trusted)
            .is_err());
    }

    #[test]
    fn inverted_names_and_rows() {
        let inv = def().inverted().unwrap();
        assert_eq!(inv.generators, vec![vec![2, 0, 1]]);
        assert_eq!(inv.generator_name(0), "r'");
        assert_eq!(inv.name, "c3-inv");
    }
}
