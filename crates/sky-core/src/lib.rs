#![deny(missing_docs)]
#![doc = "Shared plumbing for the sky toolkit: the workspace error type, deterministic RNG handles and canonical serialisation."]

pub mod canonical;
pub mod errors;
pub mod hash;
pub mod rng;

pub use canonical::{from_json_slice, from_yaml_slice, to_canonical_json_bytes};
pub use errors::{ErrorInfo, SkyError};
pub use hash::stable_hash_string;
pub use rng::{derive_substream_seed, RngHandle};
