pub mod convert;
mod server;

pub use server::run;

#[cfg(test)]
mod server_test;
