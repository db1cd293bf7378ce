//! Initial database migration.
//!
//! Creates leave types, the balance ledger, leave requests with their
//! append-only history, and balance adjustments.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: POLICY
        // ============================================================
        db.execute_unprepared(LEAVE_TYPES_SQL).await?;

        // ============================================================
        // PART 2: LEDGER
        // ============================================================
        db.execute_unprepared(LEAVE_BALANCES_SQL).await?;

        // ============================================================
        // PART 3: REQUESTS & AUDIT
        // ============================================================
        db.execute_unprepared(LEAVE_REQUESTS_SQL).await?;
        db.execute_unprepared(LEAVE_REQUEST_HISTORY_SQL).await?;

        // ============================================================
        // PART 4: ADJUSTMENTS
        // ============================================================
        db.execute_unprepared(LEAVE_BALANCE_ADJUSTMENTS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const LEAVE_TYPES_SQL: &str = r"
CREATE TABLE leave_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL,
    name VARCHAR(100) NOT NULL,
    description TEXT,
    default_days INTEGER NOT NULL,
    max_days_per_request INTEGER NOT NULL,
    min_notice_days INTEGER NOT NULL DEFAULT 0,
    is_paid BOOLEAN NOT NULL DEFAULT true,
    requires_approval BOOLEAN NOT NULL DEFAULT true,
    color VARCHAR(7) NOT NULL DEFAULT '#3B82F6',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- Soft delete: ledger rows and past requests keep their reference
    deleted_at TIMESTAMPTZ,
    CONSTRAINT chk_leave_types_default_days CHECK (default_days BETWEEN 0 AND 365),
    CONSTRAINT chk_leave_types_max_days CHECK (max_days_per_request BETWEEN 1 AND 365),
    CONSTRAINT chk_leave_types_notice CHECK (min_notice_days >= 0)
);

CREATE UNIQUE INDEX uq_leave_types_org_name ON leave_types(organization_id, name)
    WHERE deleted_at IS NULL;
";

const LEAVE_BALANCES_SQL: &str = r"
-- One row per (employee, leave type, year). remaining = total - used - pending
-- is derived on read and may be negative.
CREATE TABLE leave_balances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL,
    employee_id UUID NOT NULL,
    leave_type_id UUID NOT NULL REFERENCES leave_types(id),
    year INTEGER NOT NULL,
    total_days NUMERIC(6, 2) NOT NULL DEFAULT 0,
    used_days NUMERIC(6, 2) NOT NULL DEFAULT 0,
    pending_days NUMERIC(6, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_leave_balances_key UNIQUE (employee_id, leave_type_id, year)
);

CREATE INDEX idx_leave_balances_org_employee ON leave_balances(organization_id, employee_id, year);
";

const LEAVE_REQUESTS_SQL: &str = r"
CREATE TABLE leave_requests (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL,
    employee_id UUID NOT NULL,
    leave_type_id UUID NOT NULL REFERENCES leave_types(id),
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    days NUMERIC(6, 2) NOT NULL,
    status VARCHAR(16) NOT NULL DEFAULT 'pending',
    reason TEXT NOT NULL,
    comments TEXT,
    approved_by UUID,
    approved_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_leave_requests_dates CHECK (start_date <= end_date),
    CONSTRAINT chk_leave_requests_days CHECK (days > 0),
    CONSTRAINT chk_leave_requests_status
        CHECK (status IN ('pending', 'approved', 'rejected', 'cancelled'))
);

CREATE INDEX idx_leave_requests_org ON leave_requests(organization_id, created_at DESC);
CREATE INDEX idx_leave_requests_employee_active ON leave_requests(employee_id, start_date, end_date)
    WHERE status IN ('pending', 'approved');
CREATE INDEX idx_leave_requests_type_active ON leave_requests(leave_type_id)
    WHERE status IN ('pending', 'approved');
";

const LEAVE_REQUEST_HISTORY_SQL: &str = r"
CREATE TABLE leave_request_history (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    leave_request_id UUID NOT NULL REFERENCES leave_requests(id),
    action VARCHAR(16) NOT NULL,
    status VARCHAR(16) NOT NULL,
    actor_id UUID NOT NULL,
    comment TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_history_action CHECK (action IN ('create', 'approve', 'reject', 'cancel')),
    CONSTRAINT chk_history_status
        CHECK (status IN ('pending', 'approved', 'rejected', 'cancelled'))
);

CREATE INDEX idx_leave_request_history_request
    ON leave_request_history(leave_request_id, created_at DESC);
";

const LEAVE_BALANCE_ADJUSTMENTS_SQL: &str = r"
CREATE TABLE leave_balance_adjustments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL,
    leave_balance_id UUID NOT NULL REFERENCES leave_balances(id),
    delta NUMERIC(5, 2) NOT NULL,
    reason TEXT NOT NULL,
    requested_by UUID NOT NULL,
    approved_by UUID,
    approved_at TIMESTAMPTZ,
    comments TEXT,
    status VARCHAR(16) NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_adjustments_delta CHECK (delta <> 0),
    CONSTRAINT chk_adjustments_status CHECK (status IN ('pending', 'approved', 'rejected'))
);

CREATE INDEX idx_adjustments_balance ON leave_balance_adjustments(leave_balance_id, created_at DESC);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: prevent_history_mutation
-- History rows are append-only
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_history_mutation()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Leave request history is append-only';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_history_mutation
BEFORE UPDATE OR DELETE ON leave_request_history
FOR EACH ROW
EXECUTE FUNCTION prevent_history_mutation();

-- ============================================================
-- FUNCTION: prevent_ledger_delete
-- Ledger rows are never deleted
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_ledger_delete()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Leave balances cannot be deleted';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_ledger_delete
BEFORE DELETE ON leave_balances
FOR EACH ROW
EXECUTE FUNCTION prevent_ledger_delete();
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS leave_balance_adjustments CASCADE;
DROP TABLE IF EXISTS leave_request_history CASCADE;
DROP TABLE IF EXISTS leave_requests CASCADE;
DROP TABLE IF EXISTS leave_balances CASCADE;
DROP TABLE IF EXISTS leave_types CASCADE;
DROP FUNCTION IF EXISTS prevent_history_mutation();
DROP FUNCTION IF EXISTS prevent_ledger_delete();
";
