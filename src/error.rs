use kstring::KString;

#[derive(thiserror::Error, Debug)]
pub enum UrlError {
    #[error("route {0:?} not defined")]
    RouteNotDefined(KString),
    #[error("action {0:?} not defined")]
    ActionNotDefined(KString),
    #[error("missing parameter {param:?} for {route:?}")]
    MissingParameter { route: KString, param: KString },
}

#[derive(thiserror::Error, Debug)]
pub enum HtmlError {
    #[error("component {0:?} not found")]
    ComponentNotFound(KString),
    #[error("method {0:?} does not exist")]
    MethodNotFound(KString),
    #[error("url resolution: {0}")]
    Url(#[from] UrlError),
    #[error("rendering view {view:?}: {error:#}")]
    View { view: KString, error: anyhow::Error },
    #[error("macro {name:?}: {error:#}")]
    Macro { name: KString, error: anyhow::Error },
}
