//! Share model: how sharings, single shares and fresh randoms are named.
//!
//! A sharing of a secret bit is an array of `d + 1` shares whose sum is the
//! secret. Sharings are identified by a structured [`Key`] which is only
//! turned into a display name when the document is printed.

use std::fmt;

use serde::Serialize;

/// Structured identifier of a sharing: `(role, round, party, position)`
/// plus an optional suffix tag (e.g. the `ab` of an S-box AND gate).
///
/// Renders as `[r<round>_]<role>[_P<party>][_<position>][_<tag>]`, with a
/// trailing `_` when the last component is numeric.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Key {
    pub role: &'static str,
    pub round: Option<usize>,
    pub party: Option<usize>,
    pub position: Option<usize>,
    pub tag: Option<&'static str>,
}

impl Key {
    pub const fn new(role: &'static str) -> Self {
        Key {
            role,
            round: None,
            party: None,
            position: None,
            tag: None,
        }
    }

    pub const fn round(mut self, round: usize) -> Self {
        self.round = Some(round);
        self
    }

    pub const fn party(mut self, party: usize) -> Self {
        self.party = Some(party);
        self
    }

    pub const fn position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub const fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    /// The `index`-th share of this sharing.
    pub fn at(self, index: usize) -> Operand {
        Operand {
            name: Name::Sharing(self),
            index: Some(index),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_assert!(self.role.chars().all(|c| c.is_ascii_lowercase()));
        if let Some(round) = self.round {
            write!(f, "r{}_", round)?;
        }
        f.write_str(self.role)?;
        if let Some(party) = self.party {
            write!(f, "_P{}", party)?;
        }
        if let Some(position) = self.position {
            write!(f, "_{}", position)?;
        }
        match self.tag {
            Some(tag) => write!(f, "_{}", tag),
            None if self.party.is_some() || self.position.is_some() => f.write_str("_"),
            None => Ok(()),
        }
    }
}

/// Unordered pair of share indices `(i, j)` with `i < j`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Pair(pub usize, pub usize);

impl Pair {
    fn write(&self, f: &mut fmt::Formatter<'_>, prefix: char) -> fmt::Result {
        // single digits are concatenated, wider indices need a separator
        if self.0 < 10 && self.1 < 10 {
            write!(f, "{}{}{}", prefix, self.0, self.1)
        } else {
            write!(f, "{}{}_{}", prefix, self.0, self.1)
        }
    }
}

/// Any identifier appearing in a procedure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Name {
    /// a whole sharing `x[0:d]`
    Sharing(Key),
    /// fresh random element of a pool
    Random(Pair),
    /// cross product `a[i] * b[j]` of the ISW multiplication
    Product(usize, usize),
    /// blinded sum of the two cross products of a pair
    Message(Pair),
}

impl Name {
    pub fn is_sharing(&self) -> bool {
        matches!(self, Name::Sharing(_))
    }
}

impl From<Key> for Name {
    fn from(key: Key) -> Self {
        Name::Sharing(key)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Sharing(key) => key.fmt(f),
            Name::Random(pair) => pair.write(f, 'r'),
            Name::Product(i, j) => write!(f, "a{}_b{}", i, j),
            Name::Message(pair) => pair.write(f, 'm'),
        }
    }
}

/// A statement operand: a whole sharing, one share of it, or a scalar.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Operand {
    pub name: Name,
    pub index: Option<usize>,
}

impl From<Key> for Operand {
    fn from(key: Key) -> Self {
        Operand {
            name: Name::Sharing(key),
            index: None,
        }
    }
}

impl From<Name> for Operand {
    fn from(name: Name) -> Self {
        Operand { name, index: None }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.name, index),
            None => self.name.fmt(f),
        }
    }
}

/// The fresh randoms consumed by a single REFM or AND instantiation:
/// one element per pair `0 <= i < j <= d`.
///
/// Every gadget declaring a pool gets its own; the verifier (and the
/// evaluator) draw new values for each instantiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomPool {
    pairs: Vec<Pair>,
}

impl RandomPool {
    pub fn allocate(masking: usize) -> Self {
        let mut pairs = Vec::with_capacity(masking * (masking + 1) / 2);
        for i in 0..masking {
            for j in (i + 1)..=masking {
                pairs.push(Pair(i, j));
            }
        }
        RandomPool { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs[..]
    }

    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.pairs.iter().map(|pair| Name::Random(*pair))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    #[test]
    fn test_key_display() {
        assert_eq!(Key::new("lx").to_string(), "lx");
        assert_eq!(Key::new("lsk").position(2).to_string(), "lsk_2_");
        assert_eq!(Key::new("helper").party(3).to_string(), "helper_P3_");
        assert_eq!(
            Key::new("tape").round(1).party(2).position(3).to_string(),
            "r1_tape_P2_3_"
        );
        assert_eq!(Key::new("helper").party(1).tag("ab").to_string(), "helper_P1_ab");
        assert_eq!(Key::new("rk").round(0).position(7).to_string(), "r0_rk_7_");
        assert_eq!(Key::new("lxy").tag("nm1").to_string(), "lxy_nm1");
    }

    #[test]
    fn test_operand_display() {
        assert_eq!(Key::new("x").at(0).to_string(), "x[0]");
        assert_eq!(Operand::from(Key::new("lx").party(1)).to_string(), "lx_P1_");
        assert_eq!(Operand::from(Name::Random(Pair(0, 1))).to_string(), "r01");
        assert_eq!(Operand::from(Name::Product(1, 0)).to_string(), "a1_b0");
        assert_eq!(Operand::from(Name::Message(Pair(2, 3))).to_string(), "m23");
    }

    #[test]
    fn test_pool_size() {
        for d in 0..12 {
            let pool = RandomPool::allocate(d);
            assert_eq!(pool.len(), d * (d + 1) / 2);
            assert_eq!(pool.is_empty(), d == 0);
            for Pair(i, j) in pool.pairs() {
                assert!(i < j && *j <= d);
            }
        }
    }

    #[test]
    fn test_pool_names_distinct() {
        // pairs such as (1, 11) and (11, 1) must not collapse into one name
        for d in [1, 2, 9, 10, 12] {
            let pool = RandomPool::allocate(d);
            let names: HashSet<String> = pool.names().map(|n| n.to_string()).collect();
            assert_eq!(names.len(), pool.len());
        }
    }

    #[test]
    fn test_key_names_distinct() {
        let mut names = HashSet::new();
        for round in 0..12 {
            for party in 1..12 {
                for position in 1..12 {
                    let key = Key::new("tape").round(round).party(party).position(position);
                    assert!(names.insert(key.to_string()), "collision on {}", key);
                }
            }
        }
    }
}
