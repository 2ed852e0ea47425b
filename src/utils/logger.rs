//! ロギングユーティリティモジュール
//!
//! このモジュールには、サンドボックスのロギング設定が含まれています。
//! WebAssemblyではブラウザのコンソールへ出力し、ネイティブではログの最大レベルのみ設定します。

use serde::{Deserialize, Serialize};

/// ログレベル
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// デバッグ情報（詳細な情報）
    Debug,
    /// 情報（一般的な情報）
    #[default]
    Info,
    /// 警告（潜在的な問題）
    Warning,
    /// エラー（実行を妨げる問題）
    Error,
}

impl LogLevel {
    /// `log`クレートのレベルに変換
    pub fn to_level(self) -> log::Level {
        match self {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }

    /// `log`クレートのフィルタに変換
    pub fn to_level_filter(self) -> log::LevelFilter {
        self.to_level().to_level_filter()
    }
}

/// ロギング初期化
///
/// wasm32ではwasm_loggerを初期化します。二回目以降の呼び出しではレベルのみ更新されます。
pub fn init_logging(min_level: LogLevel) {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            wasm_logger::init(wasm_logger::Config::new(log::Level::Trace));
        });
    }

    log::set_max_level(min_level.to_level_filter());
    log::info!("logger initialized (min level: {:?})", min_level);
}
