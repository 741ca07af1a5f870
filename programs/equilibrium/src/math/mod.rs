pub mod big_num;
pub use big_num::*;

pub mod reward;
pub use reward::*;

pub mod score;
pub use score::*;
