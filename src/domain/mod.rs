mod group_name;

pub use group_name::{DEFAULT_GROUP, GroupUrlname};
