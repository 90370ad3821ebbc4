mod encoding;
pub use encoding::{decode_b64, encode_b64};

mod util;
pub use util::{getenv, getenv_opt};
