//! ユーティリティモジュール
//!
//! このモジュールには、サンドボックス全体で使用される数学プリミティブとロギング設定が含まれています。

pub mod logger;
pub mod math;

// サブモジュールの再エクスポート
pub use logger::*;
pub use math::*;
