/// Stable user identifier issued by the auth provider.
pub type UserId = String;
/// Document-store key of a match record.
pub type MatchId = String;
/// 1-based level number. Level 1 is unlocked for every new user.
pub type LevelId = u32;

pub const FIRST_LEVEL: LevelId = 1;
