//! Composite gadgets and protocol composition for the PICNIC variant.
//!
//! The offline phase derives, from the party tapes, the helper values of
//! party N for every AND gate of every round; the online phase consumes
//! tapes and helpers together with the masked key and yields the
//! broadcast messages of every party.

mod offline;
mod online;

use log::debug;

use crate::consts::*;
use crate::document::{Builder, Expr};
use crate::params::{Params, Variant};
use crate::share::Key;
use crate::Composer;

/// Role tags of the three AND gates of the S-box, in declaration order.
const GATES: [&str; 3] = ["ab", "ca", "bc"];

pub struct PicnicComposer {
    parties: usize,
    nbits: usize,
    rounds: usize,
}

impl PicnicComposer {
    pub fn new(params: &Params) -> Self {
        debug_assert_eq!(params.variant, Variant::Picnic);
        PicnicComposer {
            parties: params.parties,
            nbits: params.nbits,
            rounds: params.rounds,
        }
    }

    fn parties(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.parties
    }

    // the first N-1 parties, whose helpers come from their tapes
    fn tape_parties(&self) -> std::ops::Range<usize> {
        1..self.parties
    }

    fn positions(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.nbits
    }

    fn rounds(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.rounds
    }

    // state positions (1-based) of the s-th S-box
    fn sbox_positions(sbox: usize) -> [usize; 3] {
        let base = SBOX_WIDTH * sbox;
        [base + 1, base + 2, base + 3]
    }

    // one key per block position
    fn block(&self, key: Key) -> Vec<Key> {
        self.positions().map(|i| key.position(i)).collect()
    }

    // per position, per party (party index varies fastest)
    fn per_party(&self, key: Key, parties: impl Iterator<Item = usize> + Clone) -> Vec<Key> {
        self.positions()
            .flat_map(|i| parties.clone().map(move |j| key.party(j).position(i)))
            .collect()
    }

    // per round, per position, per party
    fn per_round(&self, key: Key, parties: impl Iterator<Item = usize> + Clone) -> Vec<Key> {
        self.rounds()
            .flat_map(|k| self.per_party(key.round(k), parties.clone()))
            .collect()
    }

    /// Public affine layer: every output is the sum of all inputs.
    fn affine(&self, builder: &mut Builder) {
        let st = Key::new("st");
        let a = Key::new("a");

        let mut proc = builder.begin_proc(AFFINE);
        proc.describe("Affine layer gadget")
            .declare_inputs(self.block(st))
            .declare_outputs(self.block(a));
        for i in self.positions() {
            proc.assign(a.position(i), Expr::add(st.position(1), st.position(2)));
            for j in 3..=self.nbits {
                proc.assign(a.position(i), Expr::add(a.position(i), st.position(j)));
            }
        }
        proc.end_proc();
    }

    /// Top level: refresh and mask the secret key, run both phases.
    fn mpc(&self, builder: &mut Builder) {
        let last = self.rounds + 1;
        let sk = Key::new("sk");
        let rsk = Key::new("rsk");
        let lsk = Key::new("lsk");
        let hsk = Key::new("hsk");
        let zero = Key::new("zero");
        let tape = Key::new("tape");
        let helper = Key::new("helper");
        let msgs = Key::new("msgs");
        let stin = Key::new("stin").round(last);
        let last_party = std::iter::once(self.parties);

        let mut proc = builder.begin_proc(PICNIC_MPC);
        proc.declare_inputs(self.block(sk))
            .declare_inputs(self.per_round(tape, self.parties()))
            .declare_inputs(self.per_round(helper, self.tape_parties()))
            .declare_inputs(self.block(zero))
            .declare_outputs(self.per_round(helper, last_party.clone()))
            .declare_outputs(self.block(hsk))
            .declare_outputs(self.per_round(msgs, self.parties()))
            .declare_outputs(self.block(stin))
            .declare_shares(self.block(rsk))
            .declare_shares(self.block(lsk));

        proc.note("offline phase");
        let mut outputs = self.per_round(helper, last_party);
        outputs.extend(self.block(lsk));
        let mut inputs = self.per_round(tape, self.parties());
        inputs.extend(self.per_round(helper, self.tape_parties()));
        inputs.extend(self.block(zero));
        proc.call(outputs, PICNIC_OFFLINE, inputs);

        proc.note("refresh & mask secret key");
        for i in self.positions() {
            proc.call(vec![rsk.position(i)], REFM, vec![sk.position(i)]);
        }
        for i in self.positions() {
            proc.assign(hsk.position(i), Expr::add(rsk.position(i), lsk.position(i)));
        }

        proc.note("online phase");
        let mut outputs = self.per_round(msgs, self.parties());
        outputs.extend(self.block(stin));
        let mut inputs = self.block(hsk);
        inputs.extend(self.per_round(tape, self.parties()));
        inputs.extend(self.per_round(helper, self.parties()));
        proc.call(outputs, PICNIC_ONLINE, inputs);
        proc.end_proc();
    }
}

impl Composer for PicnicComposer {
    fn variant(&self) -> Variant {
        Variant::Picnic
    }

    fn compose(&self, builder: &mut Builder) {
        debug!(
            "composing PICNIC: N = {}, n = {}, r = {}",
            self.parties, self.nbits, self.rounds
        );
        self.affine(builder);

        self.and_offline(builder);
        self.sbox_offline(builder);
        self.round_offline(builder);
        self.offline(builder);

        self.and_online(builder);
        self.sbox_online(builder);
        self.round_online(builder);
        self.online(builder);

        self.mpc(builder);
    }
}
