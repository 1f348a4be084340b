use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::consts::*;
use crate::error::{Error, Result};

/// The MPC protocol whose gadgets are generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Variant {
    Picnic,
    Kkw,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Picnic => "PICNIC",
            Variant::Kkw => "KKW",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PICNIC" => Ok(Variant::Picnic),
            "KKW" => Ok(Variant::Kkw),
            other => Err(Error::UnsupportedVariant(other.to_string())),
        }
    }
}

/// Generation parameters: (N, n, r, d, variant).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Params {
    pub parties: usize,
    pub nbits: usize,
    pub rounds: usize,
    pub masking: usize,
    pub variant: Variant,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            parties: DEFAULT_PARTIES,
            nbits: DEFAULT_NBITS,
            rounds: DEFAULT_ROUNDS,
            masking: DEFAULT_MASKING,
            variant: Variant::Picnic,
        }
    }
}

impl Params {
    /// Builds and validates a parameter set, parsing the variant name.
    pub fn new(
        parties: usize,
        nbits: usize,
        rounds: usize,
        masking: usize,
        variant: &str,
    ) -> Result<Self> {
        let params = Params {
            parties,
            nbits,
            rounds,
            masking,
            variant: variant.parse()?,
        };
        params.validate()?;
        Ok(params)
    }

    /// Rejects parameters the composers cannot expand.
    ///
    /// KKW gadgets do not depend on the block size or the round count,
    /// so those are only checked for PICNIC.
    pub fn validate(&self) -> Result<()> {
        if self.parties < MIN_PARTIES {
            return Err(Error::TooFewParties {
                min: MIN_PARTIES,
                got: self.parties,
            });
        }
        if self.variant == Variant::Picnic {
            if self.nbits == 0 || self.nbits % SBOX_WIDTH != 0 {
                return Err(Error::BlockSize(self.nbits));
            }
            if self.rounds == 0 {
                return Err(Error::NoRounds);
            }
        }
        Ok(())
    }

    /// Number of fresh random elements consumed by one REFM or AND instance.
    pub fn pool_size(&self) -> usize {
        self.masking * (self.masking + 1) / 2
    }

    /// Number of S-boxes applied per LowMC round.
    pub fn sboxes(&self) -> usize {
        self.nbits / SBOX_WIDTH
    }

    /// Conventional name of the verifier file for these parameters.
    pub fn file_name(&self) -> String {
        match self.variant {
            Variant::Picnic => format!(
                "{}_N{}_n{}_r{}_d{}.{}",
                self.variant, self.parties, self.nbits, self.rounds, self.masking, FILE_EXTENSION
            ),
            Variant::Kkw => format!(
                "{}_N{}_d{}.{}",
                self.variant, self.parties, self.masking, FILE_EXTENSION
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parse() {
        assert_eq!("PICNIC".parse::<Variant>(), Ok(Variant::Picnic));
        assert_eq!("KKW".parse::<Variant>(), Ok(Variant::Kkw));
        assert_eq!(
            "RSA".parse::<Variant>(),
            Err(Error::UnsupportedVariant("RSA".to_string()))
        );
        // names are case sensitive, as in the verifier file names
        assert!("picnic".parse::<Variant>().is_err());
    }

    #[test]
    fn test_validate() {
        assert!(Params::new(3, 3, 1, 1, "PICNIC").is_ok());
        assert_eq!(
            Params::new(2, 3, 1, 1, "PICNIC"),
            Err(Error::TooFewParties { min: 3, got: 2 })
        );
        assert_eq!(Params::new(3, 4, 1, 1, "PICNIC"), Err(Error::BlockSize(4)));
        assert_eq!(Params::new(3, 0, 1, 1, "PICNIC"), Err(Error::BlockSize(0)));
        assert_eq!(Params::new(3, 3, 0, 1, "PICNIC"), Err(Error::NoRounds));
        assert_eq!(
            Params::new(4, 9, 2, 1, "RSA"),
            Err(Error::UnsupportedVariant("RSA".to_string()))
        );

        // degenerate masking is allowed
        assert!(Params::new(3, 3, 1, 0, "PICNIC").is_ok());

        // kkw ignores the block size and the round count
        assert!(Params::new(4, 4, 0, 2, "KKW").is_ok());
        assert!(Params::new(2, 9, 2, 2, "KKW").is_err());
    }

    #[test]
    fn test_file_name() {
        let picnic = Params::new(3, 9, 2, 1, "PICNIC").unwrap();
        assert_eq!(picnic.file_name(), "PICNIC_N3_n9_r2_d1.mv");

        let kkw = Params::new(4, 9, 2, 2, "KKW").unwrap();
        assert_eq!(kkw.file_name(), "KKW_N4_d2.mv");
    }

    #[test]
    fn test_pool_size() {
        let mut params = Params::default();
        for d in 0..8 {
            params.masking = d;
            assert_eq!(params.pool_size(), (0..d).map(|i| d - i).sum::<usize>());
        }
    }
}
