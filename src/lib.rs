
// GF(2) arithmetic used to evaluate gadgets in the clear
pub mod algebra;

// generation parameters and their validation
pub mod params;

// internal constants: gadget names, defaults
pub mod consts;

mod error;

// structured names of sharings, randoms and products
pub mod share;

// procedures, statements and claims; rendering to the verifier grammar
pub mod document;

// REFM, AND and the parity gadgets shared by every variant
pub mod gadgets;

// protocol composers
pub mod kkw;
pub mod picnic;

// which procedures carry a security claim
pub mod claims;

// clear evaluation of generated gadgets
pub mod eval;

use log::info;

pub use claims::ClaimSet;
pub use document::{Builder, Document};
pub use error::{Error, Result};
pub use params::{Params, Variant};

/// Expands the variant specific gadgets on top of the base library.
pub trait Composer {
    fn variant(&self) -> Variant;

    fn compose(&self, builder: &mut Builder);
}

/// Generates the complete document for one parameter set: base library,
/// the variant's composites in dependency order, then the claims.
pub fn generate(params: &Params, claims: ClaimSet) -> Result<Document> {
    params.validate()?;
    info!(
        "generating {} gadgets: N = {}, n = {}, r = {}, d = {}",
        params.variant, params.parties, params.nbits, params.rounds, params.masking
    );

    let mut builder = Builder::new(params.clone());
    gadgets::base_library(&mut builder);

    let composer: Box<dyn Composer> = match params.variant {
        Variant::Picnic => Box::new(picnic::PicnicComposer::new(params)),
        Variant::Kkw => Box::new(kkw::KkwComposer::new(params)),
    };
    composer.compose(&mut builder);
    claims::annotate(&mut builder, composer.variant(), claims);

    let document = builder.finish();
    info!(
        "generated {} procedures, {} claims",
        document.procs.len(),
        document.claims.len()
    );
    Ok(document)
}
