use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const CRATE_TARGET: &str = "kampus_skill";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 終端機用的精簡格式
    #[default]
    Compact,
    /// 給嵌入式宿主（例如後端服務）收集的 JSON
    Json,
}

impl LogFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// 沒有設定 RUST_LOG 時的預設過濾條件
pub fn default_directive(format: LogFormat, verbose: bool) -> String {
    match (verbose, format) {
        (true, _) => format!("{}=debug,info", CRATE_TARGET),
        (false, LogFormat::Json) => format!("{}=info", CRATE_TARGET),
        // CLI 預設只顯示警告，避免干擾表格輸出
        (false, LogFormat::Compact) => format!("{}=warn", CRATE_TARGET),
    }
}

/// 初始化全域 logger，一律寫到 stderr；已初始化過時回傳 false
pub fn init_logger(format: LogFormat, verbose: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(format, verbose)));

    let base = fmt::layer()
        .with_target(verbose)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let layer = match format {
        LogFormat::Compact => base.compact().boxed(),
        LogFormat::Json => base.json().flatten_event(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok()
}
