//! Database seeder for Leavewise development and testing.
//!
//! Seeds a demo organization's leave types, initializes the current year's
//! balances for a handful of demo employees and files one pending request.
//! Running it twice leaves the data unchanged.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use leavewise_core::LeaveError;
use leavewise_core::balance::BalanceKey;
use leavewise_core::leave_type::LeaveTypeInput;
use leavewise_core::policy::LeavePolicy;
use leavewise_core::request::NewLeaveRequest;
use leavewise_db::repositories::LeaveRequestFilter;
use leavewise_db::{
    LeaveBalanceRepository, LeaveRequestRepository, LeaveTypeRepository, connect_with,
};
use leavewise_shared::AppConfig;
use leavewise_shared::types::{EmployeeId, LeaveTypeId, OrganizationId, PageRequest, UserId};
use sea_orm::DatabaseConnection;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::{Uuid, uuid};

/// Demo organization (consistent for all seeds).
const DEMO_ORG_ID: Uuid = uuid!("00000000-0000-0000-0000-000000000001");
/// Demo HR user that files seed requests.
const DEMO_USER_ID: Uuid = uuid!("00000000-0000-0000-0000-000000000002");

const DEMO_EMPLOYEES: [Uuid; 3] = [
    uuid!("00000000-0000-0000-0000-000000000101"),
    uuid!("00000000-0000-0000-0000-000000000102"),
    uuid!("00000000-0000-0000-0000-000000000103"),
];

/// (name, default days, max days per request, min notice, paid, color)
const LEAVE_TYPES: [(&str, u32, u32, u32, bool, &str); 4] = [
    ("Annual Leave", 20, 10, 7, true, "#3B82F6"),
    ("Sick Leave", 10, 5, 0, true, "#EF4444"),
    ("Personal Leave", 3, 2, 1, true, "#10B981"),
    ("Unpaid Leave", 0, 30, 14, false, "#6B7280"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leavewise=debug,seeder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = connect_with(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let org_id = OrganizationId::from_uuid(DEMO_ORG_ID);
    let leave_type_ids = seed_leave_types(&db, org_id).await?;

    let year = Utc::now().year();
    let employees: Vec<EmployeeId> = DEMO_EMPLOYEES
        .iter()
        .copied()
        .map(EmployeeId::from_uuid)
        .collect();
    let run = LeaveBalanceRepository::new(db.clone())
        .initialize_yearly_balances(org_id, year, &employees, &leave_type_ids)
        .await?;
    info!(
        year,
        created = run.created.len(),
        skipped = run.skipped.len(),
        "Initialized leave balances"
    );

    let policy = LeavePolicy::from(&config.leave);
    seed_sample_request(&db, policy, org_id, employees[0], leave_type_ids[0]).await?;

    info!("Seeding complete");
    Ok(())
}

/// Creates the demo leave types, reusing any that already exist.
async fn seed_leave_types(
    db: &DatabaseConnection,
    org_id: OrganizationId,
) -> anyhow::Result<Vec<LeaveTypeId>> {
    let repo = LeaveTypeRepository::new(db.clone());
    let mut ids = Vec::with_capacity(LEAVE_TYPES.len());

    for (name, default_days, max_days, notice, is_paid, color) in LEAVE_TYPES {
        let input = LeaveTypeInput {
            name: name.to_string(),
            description: None,
            default_days,
            max_days_per_request: max_days,
            min_notice_days: notice,
            is_paid,
            requires_approval: true,
            color: Some(color.to_string()),
        };

        match repo.create(org_id, &input).await {
            Ok(model) => {
                info!(name, "Created leave type");
                ids.push(LeaveTypeId::from_uuid(model.id));
            }
            Err(LeaveError::DuplicateLeaveTypeName(_)) => {
                let existing = repo
                    .list(org_id)
                    .await?
                    .into_iter()
                    .find(|lt| lt.name == name)
                    .with_context(|| format!("leave type {name} vanished"))?;
                info!(name, "Leave type already exists, skipping");
                ids.push(LeaveTypeId::from_uuid(existing.id));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(ids)
}

/// Files one pending request for `employee_id` unless they already have one.
async fn seed_sample_request(
    db: &DatabaseConnection,
    policy: LeavePolicy,
    org_id: OrganizationId,
    employee_id: EmployeeId,
    leave_type_id: LeaveTypeId,
) -> anyhow::Result<()> {
    let repo = LeaveRequestRepository::with_policy(db.clone(), policy);
    let existing = repo
        .list(
            org_id,
            LeaveRequestFilter {
                employee_id: Some(employee_id),
                status: None,
            },
            PageRequest::default(),
        )
        .await?;
    if existing.meta.total > 0 {
        info!("Sample request already exists, skipping");
        return Ok(());
    }

    let start = next_monday_after(Utc::now().date_naive() + Duration::weeks(2));
    if start.year() != Utc::now().year() {
        info!("No room left in the current year for a sample request, skipping");
        return Ok(());
    }
    let balance = LeaveBalanceRepository::new(db.clone())
        .get_by_key(org_id, BalanceKey::for_request(employee_id, leave_type_id, start))
        .await?;

    let request = repo
        .create_leave_request(
            org_id,
            &NewLeaveRequest {
                employee_id,
                leave_type_id,
                start_date: start,
                end_date: start + Duration::days(2),
                reason: "Long weekend with family".to_string(),
                submitted_by: UserId::from_uuid(DEMO_USER_ID),
            },
        )
        .await?;
    info!(
        request_id = %request.id,
        remaining_before = %balance.remaining_days(),
        "Created sample leave request"
    );
    Ok(())
}

fn next_monday_after(date: NaiveDate) -> NaiveDate {
    let mut date = date + Duration::days(1);
    while date.weekday() != Weekday::Mon {
        date += Duration::days(1);
    }
    date
}
