mod process;

pub use process::{get_pid_by_name, read_maps, read_maps_frozen};
