//! # apacheconf
//!
//! Apache httpd management helpers: a renderer that turns nested directive
//! trees into configuration files, and thin wrappers that run `apachectl`,
//! `a2enmod` and friends and parse what they print.
//!
//! ```
//! use apacheconf::{ConfigRenderer, Mapping};
//!
//! let vhost = Mapping::new()
//!     .with("this", "*:80")
//!     .with("ServerName", "example.com");
//! let text = ConfigRenderer::new().render("VirtualHost", &vhost.into()).unwrap();
//! assert_eq!(text, "<VirtualHost *:80>\nServerName example.com\n</VirtualHost>\n");
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod parser;
pub mod renderer;
pub mod sink;
pub mod status;

pub use config::{Settings, StatusProfile};
pub use error::{Error, Result};
pub use parser::{DirectiveTree, Document, Mapping, TreeParser, THIS_KEY};
pub use renderer::{ConfigRenderer, Render, RenderContext};
