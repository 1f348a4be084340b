//! Property annotator: which procedures the verifier must check, and for
//! which notion of probing security.

use std::str::FromStr;

use crate::consts::*;
use crate::document::{Builder, Property};
use crate::error::Error;
use crate::params::Variant;

use Property::{Ni, Sni};

/// Selects how many procedures carry a claim.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClaimSet {
    /// Only the protocol-level procedures.
    TopLevel,
    /// Every composite gadget as well, starting from the base library.
    /// Considerably slower to verify.
    Extended,
}

impl Default for ClaimSet {
    fn default() -> Self {
        ClaimSet::TopLevel
    }
}

impl FromStr for ClaimSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "top-level" => Ok(ClaimSet::TopLevel),
            "extended" => Ok(ClaimSet::Extended),
            other => Err(Error::UnsupportedClaimSet(other.to_string())),
        }
    }
}

const KKW_TOP_LEVEL: &[(Property, &str)] = &[(Sni, KKW_AND_OFFLINE), (Sni, KKW_AND_ONLINE)];

const PICNIC_TOP_LEVEL: &[(Property, &str)] =
    &[(Ni, PICNIC_OFFLINE), (Ni, PICNIC_ONLINE), (Ni, PICNIC_MPC)];

// REFM is only NI: pairwise blinding does not reach SNI
const BASE_EXTENDED: &[(Property, &str)] = &[(Ni, REFM), (Sni, AND)];

const PICNIC_EXTENDED: &[(Property, &str)] = &[
    (Ni, AFFINE),
    (Sni, PICNIC_AND_OFFLINE),
    (Ni, SBOX_OFFLINE),
    (Ni, LOWMC_ROUND_OFFLINE),
    (Sni, PICNIC_AND_ONLINE),
    (Ni, SBOX_ONLINE),
    (Ni, LOWMC_ROUND_ONLINE),
];

/// The claims for a variant, in emission order.
pub fn claims(variant: Variant, set: ClaimSet) -> Vec<(Property, &'static str)> {
    let mut out = Vec::new();
    if set == ClaimSet::Extended {
        out.extend_from_slice(BASE_EXTENDED);
        if variant == Variant::Picnic {
            out.extend_from_slice(PICNIC_EXTENDED);
        }
    }
    match variant {
        Variant::Picnic => out.extend_from_slice(PICNIC_TOP_LEVEL),
        Variant::Kkw => out.extend_from_slice(KKW_TOP_LEVEL),
    }
    out
}

/// Appends the claims to a fully composed document.
pub fn annotate(builder: &mut Builder, variant: Variant, set: ClaimSet) {
    for (property, target) in claims(variant, set) {
        builder.claim(property, target);
    }
}
