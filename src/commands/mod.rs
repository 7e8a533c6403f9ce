//! Command handlers: call the API, print the result

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Datelike;

use dayflow_cli::api::{
    attendance, employees, profile, timeoff, ApiClient, ApiError, Attachment, SignInRedirect,
};
use dayflow_cli::auth::{self, FileTokenStore};
use dayflow_cli::config::Config;
use dayflow_cli::filter::{self, AttendanceView};
use dayflow_cli::models::{CertificationInput, RequestStatus, SignInData, SignUpData, SkillInput};

/// Terminal stand-in for navigating to the sign-in page.
struct CliRedirect;

impl SignInRedirect for CliRedirect {
    fn redirect(&self, path: &str) {
        tracing::debug!("Redirect to {}", path);
        eprintln!("Session expired. Run 'dayflow login' to sign in again.");
    }
}

/// Shown to the user instead of the raw error chain.
fn report(err: ApiError) -> anyhow::Error {
    tracing::debug!("API error: {:?}", err);
    anyhow!(err.to_message())
}

/// Build a client from config, environment and the `--api-url` flag.
pub fn client(api_url: Option<&str>) -> Result<ApiClient> {
    let config = Config::load()?;
    let base_url = config.resolve_api_url(api_url)?;
    let store = FileTokenStore::default_location()?;
    tracing::debug!("API {} (tokens in {})", base_url, store.path().display());

    ApiClient::builder()
        .base_url(base_url)
        .token_store(Arc::new(store))
        .redirect(Arc::new(CliRedirect))
        .refresh_timeout(config.refresh_timeout())
        .build()
        .map_err(report)
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Read a secret with terminal echo turned off.
fn prompt_password(label: &str) -> Result<String> {
    rpassword::prompt_password(format!("{}: ", label)).context("Failed to read password")
}

/// Use `value` when given, otherwise ask.
fn or_ask(value: Option<String>, ask: impl FnOnce() -> Result<String>) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => ask(),
    }
}

fn dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

// -- auth --

pub async fn login(client: &ApiClient, user: Option<String>, password: Option<String>) -> Result<()> {
    let data = SignInData {
        login_identifier: or_ask(user, || prompt("Email or login ID"))?,
        password: or_ask(password, || prompt_password("Password"))?,
    };
    let auth = auth::signin(client, &data).await.map_err(report)?;
    println!(
        "Signed in as {} ({}, {:?})",
        auth.user.full_name, auth.user.login_id, auth.user.role
    );
    Ok(())
}

pub async fn signup(client: &ApiClient, company: String, name: String, email: String, phone: String) -> Result<()> {
    let password = prompt_password("Password")?;
    let confirm_password = prompt_password("Confirm password")?;
    let data = SignUpData {
        company_name: company,
        full_name: name,
        email,
        phone,
        password,
        confirm_password,
    };
    let auth = auth::signup(client, &data).await.map_err(report)?;
    println!("Company created. Your login ID is {}", auth.user.login_id);
    Ok(())
}

pub fn logout(client: &ApiClient) {
    auth::signout(client);
    println!("Logged out.");
}

pub fn status(client: &ApiClient) {
    let tokens = client.tokens();
    println!("API:           {}", client.base_url());
    println!(
        "Access token:  {}",
        if tokens.access().is_some() { "present" } else { "none" }
    );
    println!(
        "Refresh token: {}",
        if tokens.refresh().is_some() { "present" } else { "none" }
    );
    if !auth::is_authenticated(client) {
        println!("\nRun 'dayflow login' to authenticate.");
    }
}

pub fn whoami(client: &ApiClient) -> Result<()> {
    let user = auth::current_user(client).context("Not signed in. Run 'dayflow login'.")?;
    println!();
    println!("Name:     {}", dash(Some(&user.full_name)));
    println!("Login ID: {}", dash(Some(&user.login_id)));
    println!("Email:    {}", dash(Some(&user.email)));
    println!("Company:  {}", dash(Some(&user.company_name)));
    println!("Role:     {:?}", user.role);
    println!("ID:       {}", user.id);
    Ok(())
}

/// Today's attendance and leave balances, fetched concurrently.
pub async fn dashboard(client: &ApiClient) -> Result<()> {
    let (current, leave) = futures::try_join!(
        attendance::current_status(client),
        timeoff::mine(client)
    )
    .map_err(report)?;

    println!("\nToday: {}", current.status_icon);
    if current.is_checked_in {
        println!("  Checked in since {}", dash(current.since_time.as_deref()));
    }
    println!("\nLeave balances:");
    for b in &leave.balances {
        println!("  {:<24} {:>5.1} / {:<5.1}", b.type_name, b.available_days, b.allocated_days);
    }
    let pending = leave
        .requests
        .iter()
        .filter(|r| r.status == RequestStatus::Pending)
        .count();
    println!("\nPending requests: {}", pending);
    Ok(())
}

// -- attendance --

pub async fn check_in(client: &ApiClient) -> Result<()> {
    let resp = attendance::check_in(client).await.map_err(report)?;
    println!("{} (since {})", resp.message, resp.since_time);
    Ok(())
}

pub async fn check_out(client: &ApiClient) -> Result<()> {
    let resp = attendance::check_out(client).await.map_err(report)?;
    println!("{}", resp.message);
    println!("  {} - {} ({})", resp.check_in, resp.check_out, resp.duration);
    Ok(())
}

pub async fn current(client: &ApiClient) -> Result<()> {
    let s = attendance::current_status(client).await.map_err(report)?;
    println!("Status:    {}", s.status_icon);
    println!("Checked in: {}", if s.is_checked_in { "yes" } else { "no" });
    println!("Check-in:  {}", dash(s.check_in_time.as_deref()));
    println!("Check-out: {}", dash(s.check_out_time.as_deref()));
    Ok(())
}

pub async fn attendance_day(client: &ApiClient, date: Option<String>, query: &str) -> Result<()> {
    let day = attendance::admin_day(client, date.as_deref())
        .await
        .map_err(report)?;
    println!(
        "\n{}: {} present, {} absent, {} on leave",
        day.date, day.total_present, day.total_absent, day.total_on_leave
    );
    println!("{:-<72}", "");
    for r in filter::attendance(&day.employees, AttendanceView::AdminDay, query) {
        println!(
            "{:<28} {:>6} {:>6} {:>6} {:>6}  {}",
            dash(r.employee_name.as_deref()),
            r.check_in,
            r.check_out,
            r.work_hours,
            r.extra_hours,
            r.status
        );
    }
    Ok(())
}

pub async fn attendance_month(
    client: &ApiClient,
    month: Option<u32>,
    year: Option<i32>,
    query: &str,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let month = month.unwrap_or(today.month());
    let year = year.unwrap_or(today.year());
    if !(1..=12).contains(&month) {
        anyhow::bail!("Month must be between 1 and 12, got {}", month);
    }

    let m = attendance::my_month(client, Some(month), Some(year))
        .await
        .map_err(report)?;
    println!(
        "\n{} {}: {} present, {} on leave, {} working days",
        m.month, m.year, m.days_present, m.days_on_leave, m.total_days
    );
    println!("{:-<60}", "");
    for r in filter::attendance(&m.records, AttendanceView::MyMonth, query) {
        println!(
            "{:<12} {:>6} {:>6} {:>6} {:>6}  {}",
            dash(r.date.as_deref()),
            r.check_in,
            r.check_out,
            r.work_hours,
            r.extra_hours,
            r.status
        );
    }
    Ok(())
}

// -- employees --

pub async fn list_employees(client: &ApiClient, search: Option<String>, page: Option<u32>) -> Result<()> {
    let result = employees::list(client, search.as_deref(), page)
        .await
        .map_err(report)?;
    println!("\nEmployees ({} total):", result.count);
    println!("{:-<60}", "");
    if result.results.is_empty() {
        println!("  (no employees found)");
    }
    for e in filter::employees(&result.results, search.as_deref().unwrap_or_default()) {
        println!("{:<28} {:<20} {}", e.full_name, e.job_position, e.status_icon);
        println!("  ID: {}  Login: {}", e.id, e.login_id);
    }
    if result.next.is_some() {
        println!("\nMore results: use --page {}", page.unwrap_or(1) + 1);
    }
    Ok(())
}

pub async fn show_employee(client: &ApiClient, id: &str) -> Result<()> {
    let d = employees::get(client, id).await.map_err(report)?;
    println!();
    println!("Name:       {}", d.employee.full_name);
    println!("Position:   {}", dash(Some(&d.employee.job_position)));
    println!("Department: {}", dash(Some(&d.department)));
    println!("Email:      {}", d.employee.email);
    println!("Phone:      {}", dash(Some(&d.phone)));
    println!("Login ID:   {}", d.employee.login_id);
    println!("Status:     {}", d.employee.status_icon);
    Ok(())
}

// -- profile --

pub async fn show_profile(client: &ApiClient) -> Result<()> {
    let p = profile::full_profile(client).await.map_err(report)?;
    println!();
    println!("{} ({})", p.full_name, p.login_id);
    println!("  {} at {}", dash(Some(&p.profile.job_position)), p.company_name);
    println!("  Department: {}", dash(Some(&p.profile.department)));
    println!("  Manager:    {}", dash(Some(&p.profile.manager_name)));
    println!("  Location:   {}", dash(Some(&p.profile.location)));
    println!("  Email:      {}", p.email);
    println!("  Phone:      {}", dash(Some(&p.phone)));
    if !p.profile.about.is_empty() {
        println!("\nAbout:\n  {}", p.profile.about);
    }
    if !p.skills.is_empty() {
        let names: Vec<&str> = p.skills.iter().map(|s| s.name.as_str()).collect();
        println!("\nSkills: {}", names.join(", "));
    }
    if !p.certifications.is_empty() {
        println!("\nCertifications:");
        for c in &p.certifications {
            println!("  {} ({})", c.title, dash(Some(&c.issuer)));
        }
    }
    Ok(())
}

pub async fn list_skills(client: &ApiClient) -> Result<()> {
    for s in profile::skills(client).await.map_err(report)? {
        println!("{:<38} {:<24} {}", s.id, s.name, dash(Some(&s.level)));
    }
    Ok(())
}

pub async fn add_skill(client: &ApiClient, name: String, level: Option<String>) -> Result<()> {
    let skill = profile::add_skill(client, &SkillInput { name, level })
        .await
        .map_err(report)?;
    println!("Added skill {} ({})", skill.name, skill.id);
    Ok(())
}

pub async fn remove_skill(client: &ApiClient, id: &str) -> Result<()> {
    profile::delete_skill(client, id).await.map_err(report)?;
    println!("Removed skill {}", id);
    Ok(())
}

pub async fn list_certifications(client: &ApiClient) -> Result<()> {
    for c in profile::certifications(client).await.map_err(report)? {
        println!(
            "{:<38} {:<28} {:<20} {}",
            c.id,
            c.title,
            dash(Some(&c.issuer)),
            dash(c.issued_date.as_deref())
        );
    }
    Ok(())
}

pub async fn add_certification(
    client: &ApiClient,
    title: String,
    issuer: Option<String>,
    issued: Option<String>,
) -> Result<()> {
    let cert = profile::add_certification(
        client,
        &CertificationInput {
            title,
            issuer,
            issued_date: issued,
        },
    )
    .await
    .map_err(report)?;
    println!("Added certification {} ({})", cert.title, cert.id);
    Ok(())
}

pub async fn remove_certification(client: &ApiClient, id: &str) -> Result<()> {
    profile::delete_certification(client, id)
        .await
        .map_err(report)?;
    println!("Removed certification {}", id);
    Ok(())
}

pub async fn show_salary(client: &ApiClient) -> Result<()> {
    let s = profile::salary(client).await.map_err(report)?;
    println!("\nSalary structure ({}):", s.year);
    println!("  Basic:              {}", s.basic_salary);
    println!("  HRA:                {} ({}%)", s.hra_calculated, s.hra_percentage);
    println!(
        "  Standard allowance: {} ({}%)",
        s.standard_allowance_calculated, s.standard_allowance_percentage
    );
    println!("  Performance bonus:  {}", s.performance_bonus);
    println!("  LTA:                {}", s.leave_travel_allowance);
    println!("  Gross:              {}", s.gross_salary);
    println!("  PF:                 {} ({}%)", s.pf_contribution, s.pf_percentage);
    println!("  Professional tax:   {}", s.professional_tax);
    println!("  Income tax:         {}", s.income_tax);
    println!("  Deductions:         {}", s.total_deductions);
    println!("  Net:                {}", s.net_salary);
    println!("  Annual:             {}", s.annual_salary);
    Ok(())
}

// -- time off --

pub async fn my_time_off(client: &ApiClient) -> Result<()> {
    let mine = timeoff::mine(client).await.map_err(report)?;
    println!("\nBalances:");
    for b in &mine.balances {
        println!(
            "  {:<24} {:>5.1} available ({:.1} used of {:.1})  type {}",
            b.type_name,
            b.available_days,
            b.used_days,
            b.allocated_days,
            b.type_id.as_deref().unwrap_or(&b.type_code)
        );
    }
    println!("\nRequests:");
    if mine.requests.is_empty() {
        println!("  (none)");
    }
    for r in &mine.requests {
        println!(
            "  {} .. {}  {:<20} {:>4.1}d  {}",
            r.start_date,
            r.end_date,
            r.timeoff_type_name,
            r.allocation_days,
            r.status.as_str()
        );
        if let Some(reason) = r.rejection_reason.as_deref().filter(|s| !s.is_empty()) {
            println!("      reason: {}", reason);
        }
    }
    Ok(())
}

pub async fn request_time_off(
    client: &ApiClient,
    timeoff_type: String,
    from: String,
    to: String,
    attachment: Option<&Path>,
) -> Result<()> {
    let attachment = attachment
        .map(Attachment::from_path)
        .transpose()
        .map_err(report)?;
    let new = timeoff::NewTimeOff {
        timeoff_type,
        start_date: from,
        end_date: to,
        attachment,
    };
    let days = new.calendar_days().map_err(report)?;
    tracing::info!("Requesting {} calendar day(s) off...", days);

    let created = timeoff::create(client, &new).await.map_err(report)?;
    println!("{}", created.message);
    println!(
        "  {} .. {}: {:.1} day(s), {}",
        created.request.start_date,
        created.request.end_date,
        created.request.allocation_days,
        created.request.status.as_str()
    );
    Ok(())
}

pub async fn admin_time_off(
    client: &ApiClient,
    status: Option<String>,
    search: Option<String>,
    page: Option<u32>,
    query: &str,
) -> Result<()> {
    let status = status
        .map(|s| s.parse::<RequestStatus>())
        .transpose()
        .map_err(|e| anyhow!(e))?;
    let requests = timeoff::admin_list(
        client,
        &timeoff::AdminQuery {
            status,
            search,
            page,
        },
    )
    .await
    .map_err(report)?;

    println!("\nTime-off requests:");
    println!("{:-<80}", "");
    for r in filter::time_off(&requests, query) {
        println!(
            "{:<24} {:<18} {} .. {} {:>4.1}d {}",
            dash(r.employee_name.as_deref()),
            r.timeoff_type_name,
            r.start_date,
            r.end_date,
            r.allocation_days,
            r.status.as_str()
        );
        println!("  ID: {}", r.id);
    }
    Ok(())
}

pub async fn approve(client: &ApiClient, id: &str) -> Result<()> {
    let reviewed = timeoff::approve(client, id).await.map_err(report)?;
    println!("{}", reviewed.message);
    Ok(())
}

pub async fn reject(client: &ApiClient, id: &str, reason: &str) -> Result<()> {
    let reviewed = timeoff::reject(client, id, reason).await.map_err(report)?;
    println!("{}", reviewed.message);
    Ok(())
}
