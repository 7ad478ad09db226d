pub mod config;
pub mod error;
pub mod logging;

pub mod checksum;
pub mod corpus;
pub mod dispatcher;
pub mod fetch;
pub mod scan;
pub mod url_list;
