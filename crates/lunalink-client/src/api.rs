//! LunaLink REST API client.
//!
//! Typed access to the chat, dashboard, invitation and push endpoints with
//! session cookie injection and server error extraction.

mod chat;
mod dashboard;
mod invitations;
mod push;
mod request;

pub mod models;

pub use models::{
    ActionResponse, AnniversaryRequest, ChatMessage, EmailStatus, HugRequest, InvitationRequest,
    MediaItem, MediaList, MediaUpload, MessageMedia, MessagesPage, MoodRequest, NoteRequest,
    OutgoingMessage, PushSubscriptionDescriptor, SubscriptionKeys, TestEmailRequest,
    UnsubscribeRequest,
};

use crate::ClientError;

/// Name of the session cookie issued by the LunaLink server on login.
pub const SESSION_COOKIE_NAME: &str = "session";

/// LunaLink API client bound to one server and one logged-in session.
#[derive(Clone)]
pub struct LunaLinkApiClient {
    pub(super) http: reqwest::Client,
    pub(super) base_url: url::Url,
    pub(super) session_cookie: Option<String>,
}
