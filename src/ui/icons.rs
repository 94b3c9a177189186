pub struct Icons;

impl Icons {
    pub const BOOK: &str = "📚";
    pub const CHECK: &str = "✅";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const LINK: &str = "🔗";
    pub const STUDENT: &str = "🎒";
    pub const TEACHER: &str = "🧑‍🏫";
    pub const COURSE: &str = "📘";
    pub const FILE: &str = "📄";
}
