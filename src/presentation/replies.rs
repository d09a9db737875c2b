//! User-facing reply texts.

use std::fmt::Write;
use std::path::Path;

use crate::domain::entities::{CollectionStats, StoredImage};

/// Caption sent with a triggered sticker.
pub const TRIGGER_CAPTION: &str = "耄耋来咯～";
/// Trigger reply when the collection is empty.
pub const TRIGGER_EMPTY: &str = "耄耋来咯～（暂无表情包可用）";
/// Trigger reply when the collection cannot be read.
pub const TRIGGER_ERROR: &str = "耄耋暂时来不了（读取表情包时发生错误）";

/// Add command without any image to download.
pub const ADD_NO_IMAGE: &str = "请发送或回复包含图片的消息来添加表情包";
/// Add command where every download failed.
pub const ADD_FAILED: &str = "表情包添加失败，请重试";
/// Generic add failure.
pub const ADD_ERROR: &str = "添加表情包时发生错误";

/// List command on an empty collection.
pub const LIST_EMPTY: &str = "暂无表情包，使用『添加表情包』命令来添加吧！";
/// Generic list failure.
pub const LIST_ERROR: &str = "获取表情包列表时发生错误";

/// Clear command on an empty collection.
pub const CLEAR_EMPTY: &str = "没有表情包可清理";
/// Generic clear failure.
pub const CLEAR_ERROR: &str = "清理表情包时发生错误";

/// Caption sent with a random sticker.
pub const RANDOM_CAPTION: &str = "随机表情包来咯～";
/// Random command on an empty collection.
pub const RANDOM_EMPTY: &str = "暂无表情包可用，使用『添加表情包』命令来添加吧！";
/// Generic random failure.
pub const RANDOM_ERROR: &str = "发送表情包时发生错误";

/// Admin-only command invoked by a regular user.
pub const ADMIN_ONLY: &str = "该命令仅限管理员使用";

/// Summary of an add command with at least one stored image.
#[must_use]
pub fn added(stored: usize, failed: usize) -> String {
    if failed == 0 {
        format!("共添加了 {stored} 张图片")
    } else {
        format!("共添加了 {stored} 张图片（{failed} 张失败）")
    }
}

/// Summary of a clear command.
#[must_use]
pub fn cleared(count: usize) -> String {
    format!("已清理 {count} 个表情包文件")
}

#[allow(clippy::cast_precision_loss)]
fn size_kb(image: &StoredImage) -> f64 {
    image.size() as f64 / 1024.0
}

/// Multi-line collection statistics for the list command.
#[must_use]
pub fn stats_report(stats: &CollectionStats, root: &Path, recent_count: usize) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "📦 表情包统计:");
    let _ = writeln!(report, "📊 总数: {} 张", stats.count);
    let _ = writeln!(report, "💾 占用空间: {:.2} MB", stats.total_size_mb());
    let _ = writeln!(report, "📁 存储路径: {}", root.display());
    let _ = writeln!(report);
    let _ = writeln!(report, "最近添加的{recent_count}张表情包:");

    for (i, image) in stats.recent.iter().enumerate() {
        let _ = writeln!(
            report,
            "{}. {} ({:.1} KB)",
            i + 1,
            image.file_name(),
            size_kb(image)
        );
    }

    report
}
