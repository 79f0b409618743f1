pub mod normalize;
pub mod remote;

pub use normalize::{ANY_VALUE, category_token, normalize, parse_page};
pub use remote::{RemoteQuery, RemoteQueryOptions, remote_sort_field};
