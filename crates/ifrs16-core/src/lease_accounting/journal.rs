//! Journal entries for lease recognition, payments and depreciation.
//!
//! Each accounting event is an independent balanced set of rows tagged with
//! its `EntryKind`; there is no general ledger behind it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amortization::CashflowRow;
use super::depreciation::DepreciationRow;
use super::measurement::InitialMeasurement;
use crate::error::Ifrs16Error;
use crate::types::Money;
use crate::Ifrs16Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Recognition,
    Payment,
    Depreciation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerAccount {
    #[serde(rename = "Right-of-Use Asset")]
    RightOfUseAsset,
    #[serde(rename = "Lease Liability")]
    LeaseLiability,
    #[serde(rename = "Interest Expense")]
    InterestExpense,
    #[serde(rename = "Cash/Bank")]
    CashAtBank,
    #[serde(rename = "Depreciation Expense")]
    DepreciationExpense,
    #[serde(rename = "Accumulated Depreciation - ROU")]
    AccumulatedDepreciation,
    #[serde(rename = "Prepaid Lease Payments")]
    PrepaidLeasePayments,
    #[serde(rename = "Lease Incentive Receivable")]
    LeaseIncentiveReceivable,
}

impl LedgerAccount {
    pub fn name(self) -> &'static str {
        match self {
            LedgerAccount::RightOfUseAsset => "Right-of-Use Asset",
            LedgerAccount::LeaseLiability => "Lease Liability",
            LedgerAccount::InterestExpense => "Interest Expense",
            LedgerAccount::CashAtBank => "Cash/Bank",
            LedgerAccount::DepreciationExpense => "Depreciation Expense",
            LedgerAccount::AccumulatedDepreciation => "Accumulated Depreciation - ROU",
            LedgerAccount::PrepaidLeasePayments => "Prepaid Lease Payments",
            LedgerAccount::LeaseIncentiveReceivable => "Lease Incentive Receivable",
        }
    }
}

/// A single debit or credit line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Sequence number of the balanced set this line belongs to
    pub event: u32,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    pub date: NaiveDate,
    pub account: LedgerAccount,
    pub debit: Money,
    pub credit: Money,
    pub memo: String,
}

struct EntrySet {
    kind: EntryKind,
    period: Option<u32>,
    date: NaiveDate,
    lines: Vec<(LedgerAccount, Money, Money, String)>,
}

impl EntrySet {
    fn new(kind: EntryKind, period: Option<u32>, date: NaiveDate) -> Self {
        EntrySet {
            kind,
            period,
            date,
            lines: Vec::with_capacity(3),
        }
    }

    fn debit(mut self, account: LedgerAccount, amount: Money, memo: String) -> Self {
        if !amount.is_zero() {
            self.lines.push((account, amount, Decimal::ZERO, memo));
        }
        self
    }

    fn credit(mut self, account: LedgerAccount, amount: Money, memo: String) -> Self {
        if !amount.is_zero() {
            self.lines.push((account, Decimal::ZERO, amount, memo));
        }
        self
    }

    fn check_balanced(&self) -> Ifrs16Result<()> {
        let debits: Money = self.lines.iter().map(|l| l.1).sum();
        let credits: Money = self.lines.iter().map(|l| l.2).sum();
        if debits != credits {
            return Err(Ifrs16Error::InvalidInput {
                field: "journal".into(),
                reason: format!(
                    "{:?} entry on {} does not balance: debits {} vs credits {}",
                    self.kind, self.date, debits, credits
                ),
            });
        }
        Ok(())
    }
}

/// Emit recognition, payment and depreciation entry sets in date order.
pub fn generate_journal_entries(
    contract_id: &str,
    commencement_date: NaiveDate,
    measurement: &InitialMeasurement,
    cashflows: &[CashflowRow],
    depreciation: &[DepreciationRow],
) -> Ifrs16Result<Vec<JournalEntry>> {
    let mut sets = Vec::with_capacity(1 + cashflows.len() + depreciation.len());

    sets.push(
        EntrySet::new(EntryKind::Recognition, None, commencement_date)
            .debit(
                LedgerAccount::RightOfUseAsset,
                measurement.initial_rou_asset,
                format!("Initial recognition of ROU asset, lease {contract_id}"),
            )
            .debit(
                LedgerAccount::LeaseIncentiveReceivable,
                measurement.lease_incentives,
                format!("Lease incentives receivable, lease {contract_id}"),
            )
            .credit(
                LedgerAccount::LeaseLiability,
                measurement.initial_lease_liability,
                format!("Initial recognition of lease liability, lease {contract_id}"),
            )
            .credit(
                LedgerAccount::PrepaidLeasePayments,
                measurement.prepayments,
                format!("Prepayments reclassified to ROU asset, lease {contract_id}"),
            )
            .credit(
                LedgerAccount::CashAtBank,
                measurement.initial_direct_costs,
                format!("Initial direct costs capitalised, lease {contract_id}"),
            ),
    );

    for row in cashflows {
        sets.push(
            EntrySet::new(EntryKind::Payment, Some(row.period), row.due_date)
                .debit(
                    LedgerAccount::InterestExpense,
                    row.interest,
                    format!("Interest on lease liability, period {}", row.period),
                )
                .debit(
                    LedgerAccount::LeaseLiability,
                    row.principal,
                    format!("Lease liability repayment, period {}", row.period),
                )
                .credit(
                    LedgerAccount::CashAtBank,
                    row.rent,
                    format!("Lease payment, period {}", row.period),
                ),
        );
    }

    for row in depreciation {
        sets.push(
            EntrySet::new(EntryKind::Depreciation, Some(row.period), row.date)
                .debit(
                    LedgerAccount::DepreciationExpense,
                    row.depreciation,
                    format!("ROU depreciation, period {}", row.period),
                )
                .credit(
                    LedgerAccount::AccumulatedDepreciation,
                    row.depreciation,
                    format!("ROU depreciation, period {}", row.period),
                ),
        );
    }

    sets.sort_by_key(|s| (s.date, s.kind, s.period));

    let mut entries = Vec::new();
    let mut event = 0u32;
    for set in sets.into_iter().filter(|s| !s.lines.is_empty()) {
        set.check_balanced()?;
        event += 1;
        for (account, debit, credit, memo) in set.lines {
            entries.push(JournalEntry {
                event,
                kind: set.kind,
                period: set.period,
                date: set.date,
                account,
                debit,
                credit,
                memo,
            });
        }
    }

    log::debug!("journal: {} events, {} lines", event, entries.len());
    Ok(entries)
}

/// Group journal lines by their balanced set.
pub fn entry_sets(entries: &[JournalEntry]) -> BTreeMap<u32, Vec<&JournalEntry>> {
    let mut sets: BTreeMap<u32, Vec<&JournalEntry>> = BTreeMap::new();
    for entry in entries {
        sets.entry(entry.event).or_default().push(entry);
    }
    sets
}
