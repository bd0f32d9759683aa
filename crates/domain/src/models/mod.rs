//! Domain models.

pub mod invitation;
pub mod public_invitation;
pub mod style;
pub mod theme;
pub mod user;

pub use invitation::{
    merge_document, Branding, Countdown, CustomSection, EditExpiry, GalleryConfig, GalleryLayout,
    HostSide, InvitationData, InvitationRecord, InvitationSummary, MediaItem, MediaKind,
    ScheduleItem, SectionId, TopBanner,
};
pub use public_invitation::PublicInvitation;
pub use style::{ResolvedStyle, SizeStep, StyleField, StyleOverrides};
pub use theme::Theme;
pub use user::{NewUser, Role, User, UserProfile};
