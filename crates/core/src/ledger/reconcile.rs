//! Entry reconciliation.
//!
//! Merges an incoming draft with whatever is stored under the same key and
//! recomputes the derived totals. Both paths are pure; the service owns the
//! store lookups and writes.

use rust_decimal::Decimal;
use serde_json::Value;

use super::coerce;
use super::entry::{Entry, EntryDraft};
use super::error::LedgerError;
use super::payment::normalize_payments;
use super::totals::aggregate;

/// Name given to a new entry whose draft carries none.
pub const DEFAULT_NAME: &str = "Unnamed";

/// Fields of a draft that feed an entry's identity and contact details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    /// `name`
    Name,
    /// `customerName`
    CustomerName,
    /// `customer`
    Customer,
    /// `contact`
    Contact,
    /// `phone`
    Phone,
    /// `agent`
    Agent,
    /// `agentPhone`
    AgentPhone,
}

impl DraftField {
    fn read(self, draft: &EntryDraft) -> Option<&str> {
        match self {
            Self::Name => draft.name.as_deref(),
            Self::CustomerName => draft.customer_name.as_deref(),
            Self::Customer => draft.customer.as_deref(),
            Self::Contact => draft.contact.as_deref(),
            Self::Phone => draft.phone.as_deref(),
            Self::Agent => draft.agent.as_deref(),
            Self::AgentPhone => draft.agent_phone.as_deref(),
        }
    }
}

/// Identity and contact fields of a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    /// Customer name.
    Name,
    /// Customer contact.
    Contact,
    /// Agent name.
    Agent,
    /// Agent contact.
    AgentPhone,
}

impl IdentityField {
    const fn primary(self) -> DraftField {
        match self {
            Self::Name => DraftField::Name,
            Self::Contact => DraftField::Contact,
            Self::Agent => DraftField::Agent,
            Self::AgentPhone => DraftField::AgentPhone,
        }
    }

    fn stored(self, entry: &Entry) -> Option<&str> {
        match self {
            Self::Name => Some(entry.name.as_str()),
            Self::Contact => Some(entry.contact.as_str()),
            Self::Agent => entry.agent.as_deref(),
            Self::AgentPhone => entry.agent_phone.as_deref(),
        }
    }
}

/// How a field is resolved.
///
/// On an existing entry every policy is sticky: the draft's primary field
/// wins when present, otherwise the stored value is kept. Policies differ
/// only in how a brand new entry is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// New entries take the primary field as given.
    Sticky,
    /// New entries take the first non-empty source, else `default`.
    Defaulted {
        /// Draft fields tried in order.
        sources: &'static [DraftField],
        /// Value used when every source is empty.
        default: &'static str,
    },
}

/// One row of the merge table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Field being resolved.
    pub field: IdentityField,
    /// Resolution policy.
    pub policy: FieldPolicy,
}

/// Merge table for identity and contact fields.
pub const POLICIES: [FieldRule; 4] = [
    FieldRule {
        field: IdentityField::Name,
        policy: FieldPolicy::Defaulted {
            sources: &[DraftField::Name, DraftField::CustomerName, DraftField::Customer],
            default: DEFAULT_NAME,
        },
    },
    FieldRule {
        field: IdentityField::Contact,
        policy: FieldPolicy::Defaulted {
            sources: &[DraftField::Contact, DraftField::Phone],
            default: "",
        },
    },
    FieldRule {
        field: IdentityField::Agent,
        policy: FieldPolicy::Sticky,
    },
    FieldRule {
        field: IdentityField::AgentPhone,
        policy: FieldPolicy::Sticky,
    },
];

impl FieldRule {
    /// Resolves this field for a draft, against the stored entry if any.
    #[must_use]
    pub fn resolve(&self, draft: &EntryDraft, existing: Option<&Entry>) -> Option<String> {
        let given = self.field.primary().read(draft);

        if let Some(existing) = existing {
            return given.or_else(|| self.field.stored(existing)).map(str::to_string);
        }

        match self.policy {
            FieldPolicy::Sticky => given.map(str::to_string),
            FieldPolicy::Defaulted { sources, default } => Some(
                sources
                    .iter()
                    .find_map(|source| source.read(draft).filter(|v| !v.is_empty()))
                    .unwrap_or(default)
                    .to_string(),
            ),
        }
    }
}

#[derive(Default)]
struct Identity {
    name: String,
    contact: String,
    agent: Option<String>,
    agent_phone: Option<String>,
}

fn resolve_identity(draft: &EntryDraft, existing: Option<&Entry>) -> Identity {
    let mut identity = Identity::default();

    for rule in &POLICIES {
        let value = rule.resolve(draft, existing);
        match rule.field {
            IdentityField::Name => identity.name = value.unwrap_or_default(),
            IdentityField::Contact => identity.contact = value.unwrap_or_default(),
            IdentityField::Agent => identity.agent = value,
            IdentityField::AgentPhone => identity.agent_phone = value,
        }
    }

    identity
}

/// Builds the entry a full save should persist.
///
/// `unique_id` is the key the service settled on (given or generated).
/// When the draft has no `amount`, the stored amount is kept.
///
/// # Errors
///
/// Returns `AmountOutOfRange` if the amount or any derived figure is too large.
pub fn reconcile_save(
    draft: &EntryDraft,
    existing: Option<&Entry>,
    unique_id: String,
    today: &str,
) -> Result<Entry, LedgerError> {
    let identity = resolve_identity(draft, existing);

    let amount = match (draft.amount.as_ref(), existing) {
        (None | Some(Value::Null), Some(existing)) => existing.amount,
        (raw, _) => coerce::amount(raw)?,
    };

    let payments = normalize_payments(draft.payments.as_ref(), today)?;
    let totals = aggregate(&payments, amount)?;

    let date = coerce::non_blank(draft.date.as_deref()).unwrap_or(today);

    let mut entry = Entry {
        unique_id,
        date: date.to_string(),
        name: identity.name,
        contact: identity.contact,
        agent: identity.agent,
        agent_phone: identity.agent_phone,
        amount,
        paid: Decimal::ZERO,
        expenditure: Decimal::ZERO,
        due: Decimal::ZERO,
        balance: Decimal::ZERO,
        payments,
    };
    entry.apply_totals(totals);
    Ok(entry)
}

/// Replaces the payment history of a stored entry and recomputes its totals.
///
/// Everything except `payments` and the derived figures is left untouched.
///
/// # Errors
///
/// Returns `AmountOutOfRange` if a payment or a derived figure is too large.
pub fn reconcile_history(
    mut existing: Entry,
    payments: Option<&Value>,
    today: &str,
) -> Result<Entry, LedgerError> {
    existing.payments = normalize_payments(payments, today)?;
    let totals = aggregate(&existing.payments, existing.amount)?;
    existing.apply_totals(totals);
    Ok(existing)
}
