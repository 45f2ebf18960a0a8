use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `--verbose` 時本 crate 開到 debug，其他依賴 info；否則其他依賴只顯示 warn
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "blog_helpers=debug,info"
    } else {
        "blog_helpers=info,warn"
    }
}

/// `RUST_LOG` 優先；未設定或格式錯誤時退回預設值
pub fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Logs go to stderr so command output on stdout can be piped.
pub fn init_cli_logger(verbose: bool) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .compact();

    if tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Logger already initialised");
    }
}
