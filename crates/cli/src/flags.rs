use archlift_graph::CacheRefresh;
use clap::ValueEnum;

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum RefreshFlag {
    #[default]
    Sync,
    Deferred,
}

impl RefreshFlag {
    pub(crate) const fn as_domain(self) -> CacheRefresh {
        match self {
            RefreshFlag::Sync => CacheRefresh::Synchronous,
            RefreshFlag::Deferred => CacheRefresh::Deferred,
        }
    }
}
