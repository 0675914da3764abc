use crate::api::attendance::{MarkPaid, RecentAttendance, SaveAttendance, WeeklyEntry, WeeklyQuery};
use crate::api::employee::{AttendancePeriodQuery, ChangeStatus, CreateAdvance, CreateEmployee};
use crate::api::revenue::CreateRevenue;
use crate::model::advance::SalaryAdvance;
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use crate::model::revenue::Revenue;
use crate::model::status_history::StatusHistory;
use crate::stats::aggregate::{AttendanceStats, WeekBreakdown, WeeklyStats};
use crate::stats::period::PaymentBucket;
use crate::stats::ranking::{EmployeeScore, RankingSummary};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RestoBoard API",
        version = "1.0.0",
        description = r#"
## Restaurant Management Dashboard

This API powers the back office of a fast-food restaurant: staff attendance,
salary tracking, advances and daily revenue.

### 🔹 Key Features
- **Employee Management**
  - Profiles, daily rates, status lifecycle with full history
- **Attendance**
  - One row per employee per day, weekly board, bulk payment marking
- **Salary Advances**
  - Request, approve/reject, settle
- **Revenue & Statistics**
  - Daily revenue log, rankings, payment and revenue analytics

### 🔐 Security
All endpoints under `/api/v1` are protected using **JWT Bearer authentication**.
Destructive or financial operations additionally require the **Manager** or
**Admin** role.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::change_status,
        crate::api::employee::status_history,
        crate::api::employee::employee_attendance,
        crate::api::employee::current_week,
        crate::api::employee::create_advance,
        crate::api::employee::list_advances,

        crate::api::attendance::save_attendance,
        crate::api::attendance::recent_attendance,
        crate::api::attendance::weekly_attendance,
        crate::api::attendance::mark_paid,

        crate::api::advance::approve_advance,
        crate::api::advance::reject_advance,
        crate::api::advance::pay_advance,

        crate::api::revenue::create_revenue,
        crate::api::revenue::update_revenue,
        crate::api::revenue::delete_revenue,
        crate::api::revenue::recent_revenues,

        crate::api::statistics::employee_of_week,
        crate::api::statistics::employee_of_month,
        crate::api::statistics::salary_payments,
        crate::api::statistics::revenue_analysis,
        crate::api::statistics::employee_payments,
        crate::api::statistics::employee_payments_table,

        crate::api::dashboard::stats,
        crate::api::dashboard::chart_data
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            ChangeStatus,
            StatusHistory,
            AttendanceRecord,
            SaveAttendance,
            RecentAttendance,
            WeeklyEntry,
            WeeklyQuery,
            MarkPaid,
            SalaryAdvance,
            CreateAdvance,
            AttendancePeriodQuery,
            Revenue,
            CreateRevenue,
            WeeklyStats,
            AttendanceStats,
            WeekBreakdown,
            PaymentBucket,
            EmployeeScore,
            RankingSummary
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance tracking APIs"),
        (name = "Advance", description = "Salary advance workflow APIs"),
        (name = "Revenue", description = "Daily revenue APIs"),
        (name = "Statistics", description = "Ranking and analytics APIs"),
        (name = "Dashboard", description = "Dashboard summary APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
