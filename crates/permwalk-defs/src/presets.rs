//! Well-known generator families on `n` points.
//!
//! Every family is built from `permwalk_core::perm` and returned as a
//! [`GraphDef`] whose central state is the identity arrangement `[0, n)`.

use anyhow::{ensure, Result};
use permwalk_core::{perm, Token};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::format::{GraphDef, GRAPH_DEF_VERSION};

/// Named generator family.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    /// Left shift, right shift, and the swap of positions 0 and 1.
    Lrx,
    /// All `n(n-1)/2` transpositions.
    Transpositions,
    /// Adjacent transpositions `(i, i+1)`.
    Coxeter,
    /// Adjacent transpositions plus the wrap-around `(0, n-1)`.
    CyclicCoxeter,
    /// All 3-cycles.
    ThreeCycles,
}

impl Family {
    /// Every family, in declaration order.
    pub const ALL: [Self; 5] =
        [Self::Lrx, Self::Transpositions, Self::Coxeter, Self::CyclicCoxeter, Self::ThreeCycles];

    /// Stable kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lrx => "lrx",
            Self::Transpositions => "transpositions",
            Self::Coxeter => "coxeter",
            Self::CyclicCoxeter => "cyclic-coxeter",
            Self::ThreeCycles => "three-cycles",
        }
    }

    /// Smallest `n` the family is defined for.
    #[must_use]
    pub const fn min_n(self) -> usize {
        match self {
            Self::Lrx | Self::Transpositions | Self::Coxeter => 2,
            Self::CyclicCoxeter | Self::ThreeCycles => 3,
        }
    }
}

impl std::str::FromStr for Family {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| anyhow::anyhow!("unknown family `{s}`"))
    }
}

/// Build the definition of `family` on `n` points.
pub fn build(family: Family, n: usize) -> Result<GraphDef> {
    ensure!(
        n >= family.min_n(),
        "{} needs n >= {}, got {n}",
        family.as_str(),
        family.min_n()
    );
    let (names, perms) = match family {
        Family::Lrx => lrx(n)?,
        Family::Transpositions => transpositions(n)?,
        Family::Coxeter => coxeter(n, false)?,
        Family::CyclicCoxeter => coxeter(n, true)?,
        Family::ThreeCycles => three_cycles(n)?,
    };
    let generators = perms.into_iter().map(|p| to_tokens(&p)).collect();
    Ok(GraphDef {
        version: GRAPH_DEF_VERSION,
        name: format!("{}-{n}", family.as_str()),
        generators,
        generator_names: Some(names),
        central_state: to_tokens(&perm::identity(n)),
        meta: Some(json!({ "family": family.as_str(), "n": n })),
    })
}

type Named = (Vec<String>, Vec<Vec<usize>>);

fn lrx(n: usize) -> Result<Named> {
    // Gather convention: `next[k] = cur[(k + 1) % n]` shifts contents left.
    let left: Vec<usize> = (0..n).map(|k| (k + 1) % n).collect();
    let right = perm::inverse(&left);
    let swap = perm::transposition(n, 0, 1)?;
    Ok((vec!["L".into(), "R".into(), "X".into()], vec![left, right, swap]))
}

fn transpositions(n: usize) -> Result<Named> {
    let mut names = Vec::with_capacity(n * (n - 1) / 2);
    let mut perms = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in i + 1..n {
            names.push(format!("({i},{j})"));
            perms.push(perm::transposition(n, i, j)?);
        }
    }
    Ok((names, perms))
}

fn coxeter(n: usize, cyclic: bool) -> Result<Named> {
    let mut names = Vec::with_capacity(n);
    let mut perms = Vec::with_capacity(n);
    for i in 0..n - 1 {
        names.push(format!("({i},{})", i + 1));
        perms.push(perm::transposition(n, i, i + 1)?);
    }
    if cyclic {
        names.push(format!("(0,{})", n - 1));
        perms.push(perm::transposition(n, 0, n - 1)?);
    }
    Ok((names, perms))
}

fn three_cycles(n: usize) -> Result<Named> {
    let mut lengths = vec![1; n - 2];
    lengths[0] = 3;
    let perms = perm::with_cycle_lengths(n, &lengths)?;
    let names = perms.iter().map(|p| cycle_name(p)).collect();
    Ok((names, perms))
}

/// `(a,b,c)` for the single non-trivial cycle of `p`, starting at its minimum.
fn cycle_name(p: &[usize]) -> String {
    let Some(start) = (0..p.len()).find(|&i| p[i] != i) else {
        return "()".into();
    };
    let mut parts = vec![start.to_string()];
    let mut cur = p[start];
    while cur != start {
        parts.push(cur.to_string());
        cur = p[cur];
    }
    format!("({})", parts.join(","))
}

fn to_tokens(p: &[usize]) -> Vec<Token> {
    p.iter().map(|&v| Token::try_from(v).unwrap_or(Token::MAX)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_names_round_trip() {
        for f in Family::ALL {
            assert_eq!(f.as_str().parse::<Family>().unwrap(), f);
        }
        assert!("nope".parse::<Family>().is_err());
    }

    #[test]
    fn lrx_rows() {
        let d = build(Family::Lrx, 4).unwrap();
        assert_eq!(d.generators, vec![vec![1, 2, 3, 0], vec![3, 0, 1, 2], vec![1, 0, 2, 3]]);
        assert_eq!(d.central_state, vec![0, 1, 2, 3]);
    }

    #[test]
    fn cycle_names_follow_the_map() {
        assert_eq!(cycle_name(&[1, 2, 0, 3]), "(0,1,2)");
        assert_eq!(cycle_name(&[0, 1]), "()");
    }
}
