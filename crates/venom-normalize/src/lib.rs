//! Dynamic path normalization: classification (C1), the path normalizer
//! (C2), and cardinality control (C3).

pub mod cardinality;
pub mod classify;
pub mod ids;
pub mod normalize;

pub use cardinality::{env_max_endpoints, Admission, CardinalityController, DEFAULT_MAX_ENDPOINTS};
pub use classify::{classify, TokenOutcome};
pub use normalize::{PathNormalizer, DEFAULT_CACHE_SIZE};
