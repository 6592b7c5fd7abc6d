pub mod public_ip;

pub use public_ip::{PublicIpLookup, PUBLIC_IP_UNAVAILABLE, PUBLIC_IP_URL};
