pub mod api;
pub mod category;
pub mod error;
pub mod format;
pub mod load_state;
pub mod source;
pub mod store;
pub mod types;

pub use api::NewsApi;
pub use category::{category_color, Category, CategoryColor};
pub use error::{Error, ErrorKind, Result};
pub use load_state::LoadState;
pub use source::{join_sources, SourceEntry};
pub use store::{Store, Subscription};
pub use types::{ArticleDetail, ArticleEnvelope, ArticleSection, ArticleSummary, NewsletterDate};

pub mod prelude {
    pub use crate::format::*;
    pub use crate::{
        ArticleDetail, ArticleSummary, Error, LoadState, NewsApi, NewsletterDate, Result, Store,
    };
}
