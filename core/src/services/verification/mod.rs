//! Confirmed-ownership gate over verification rounds
//!
//! Code delivery and comparison live in an external collaborator; the gate
//! only decides whether a recorded round proves ownership right now.

mod gate;

pub use gate::VerificationGate;
