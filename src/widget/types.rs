//! Type definitions for the exchange widget

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use strum::{Display, EnumIter};

use crate::data::CompletedConvert;

/// Primary navigation destination within the widget.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum TopView {
    Deposit,
    Trade,
    Convert,
    #[default]
    Summary,
    Buy,
}

impl TopView {
    /// Get the next tab in the authenticated navigation bar. The buy view
    /// sits outside the bar and maps to itself.
    pub fn next(self) -> Self {
        match self {
            Self::Deposit => Self::Trade,
            Self::Trade => Self::Convert,
            Self::Convert => Self::Summary,
            Self::Summary => Self::Deposit,
            Self::Buy => Self::Buy,
        }
    }

    /// Get the previous tab in the authenticated navigation bar.
    pub fn previous(self) -> Self {
        match self {
            Self::Deposit => Self::Summary,
            Self::Trade => Self::Deposit,
            Self::Convert => Self::Trade,
            Self::Summary => Self::Convert,
            Self::Buy => Self::Buy,
        }
    }
}

/// Quote held while the convert preview is on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConvert {
    pub amount: Decimal,
    pub from_asset: String,
    pub to_asset: String,
    pub quote_id: String,
    pub price: Decimal,
    pub fee: Decimal,
    pub received_amount: Decimal,
    pub quoted_at: DateTime<Utc>,
    pub expiry_secs: u32,
}

/// Modal state that supersedes the top view while present.
///
/// Variants carry what their screen needs, so a pending quote can only
/// exist together with the preview and never outlives it.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Disconnecting,
    AuthInvalid,
    InsufficientFunds,
    ConvertPreview(PendingConvert),
    ConvertSuccess(CompletedConvert),
    ConvertFailed { message: Option<String> },
    QrDisplay { asset: String },
}

/// The widget's current display configuration.
///
/// Mutated only through the coordinator's transition operations; the render
/// layer reads it through the accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub(crate) top_view: TopView,
    pub(crate) overlay: Option<Overlay>,
    pub(crate) deposit_selection: Option<String>,
    pub(crate) search_filter: String,
}

impl ViewState {
    pub(crate) fn new(authenticated: bool) -> Self {
        Self {
            top_view: if authenticated { TopView::Summary } else { TopView::Buy },
            overlay: None,
            deposit_selection: None,
            search_filter: String::new(),
        }
    }

    pub fn top_view(&self) -> TopView {
        self.top_view
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// The pending quote, present exactly while the preview overlay is up.
    pub fn pending_convert(&self) -> Option<&PendingConvert> {
        match &self.overlay {
            Some(Overlay::ConvertPreview(pending)) => Some(pending),
            _ => None,
        }
    }

    pub fn deposit_selection(&self) -> Option<&str> {
        self.deposit_selection.as_deref()
    }

    pub fn search_filter(&self) -> &str {
        &self.search_filter
    }
}

/// A transition whose precondition does not hold. The state is left
/// untouched; callers decide whether to surface or ignore the rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// An active overlay blocks the operation.
    OverlayActive,
    /// The operation needs an authenticated session.
    NotAuthenticated,
    /// The operation is only valid from another view or overlay.
    WrongState(&'static str),
    /// A collaborator call for this flow is still in flight.
    RequestInFlight,
    /// The asset is not part of the supported set.
    UnknownAsset(String),
    /// Convert endpoints must differ.
    SameAsset,
    /// The amount is not a positive decimal.
    InvalidAmount(String),
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::OverlayActive => write!(f, "an overlay is active"),
            Self::NotAuthenticated => write!(f, "not connected to an exchange account"),
            Self::WrongState(expected) => write!(f, "only valid {expected}"),
            Self::RequestInFlight => write!(f, "a request is already in flight"),
            Self::UnknownAsset(ticker) => write!(f, "unsupported asset '{ticker}'"),
            Self::SameAsset => write!(f, "convert endpoints must differ"),
            Self::InvalidAmount(amount) => write!(f, "'{amount}' is not a positive amount"),
        }
    }
}

impl std::error::Error for TransitionError {}
