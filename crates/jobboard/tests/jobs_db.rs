//! Job CRUD against a live database.
//!
//! Set DATABASE_URL in .env file or environment variable to run these; they
//! are skipped otherwise. Every test works on temporary tables inside a
//! transaction that is rolled back.

use std::str::FromStr;

use jobboard::value::params_ref;
use jobboard::{
    ColumnMap, GenericClient, Job, JobError, JobFilter, JobPatch, JobResult, NewJob, SqlValue,
    UpdateRecord, build_set_clause, create_pool,
};
use rust_decimal::Decimal;

const SCHEMA: &str = "
    CREATE TEMP TABLE companies (
        handle VARCHAR(25) PRIMARY KEY,
        name TEXT UNIQUE NOT NULL
    ) ON COMMIT DROP;
    CREATE TEMP TABLE jobs (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        salary INTEGER CHECK (salary >= 0),
        equity NUMERIC CHECK (equity <= 1.0),
        company_handle VARCHAR(25) NOT NULL REFERENCES companies ON DELETE CASCADE
    ) ON COMMIT DROP;
    INSERT INTO companies (handle, name) VALUES ('c1', 'C1'), ('c2', 'C2'), ('c3', 'C3');
";

fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL").ok()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn seed(conn: &impl GenericClient) -> JobResult<(i32, i32)> {
    let hello = Job::create(conn, &NewJob::new("hello", "c1").salary(45000).equity(dec("0"))).await?;
    let world =
        Job::create(conn, &NewJob::new("world", "c3").salary(55000).equity(dec("0.020"))).await?;
    Ok((hello.id, world.id))
}

macro_rules! with_tx {
    ($tx:ident, $body:block) => {{
        let Some(url) = database_url() else {
            eprintln!("DATABASE_URL not set, skipping");
            return;
        };
        let pool = create_pool(&url).unwrap();
        let mut client = pool.get().await.unwrap();
        let $tx = client.transaction().await.unwrap();
        $tx.batch_execute(SCHEMA).await.unwrap();
        $body
        // Dropping the transaction rolls it back.
        drop($tx);
    }};
}

#[tokio::test]
async fn create_returns_stored_row() {
    with_tx!(tx, {
        let job = Job::create(&tx, &NewJob::new("new", "c1").salary(45000).equity(dec("0.020")))
            .await
            .unwrap();
        assert_eq!(job.title, "new");
        assert_eq!(job.salary, Some(45000));
        assert_eq!(job.equity, Some(dec("0.020")));
        assert_eq!(job.company_handle, "c1");
    });
}

#[tokio::test]
async fn create_with_unknown_company_is_fk_violation() {
    with_tx!(tx, {
        let err = Job::create(&tx, &NewJob::new("new", "nope")).await.unwrap_err();
        assert!(matches!(err, JobError::ForeignKeyViolation(_)));
        assert_eq!(err.status_code(), 400);
    });
}

#[tokio::test]
async fn find_all_without_filter() {
    with_tx!(tx, {
        let (hello, world) = seed(&tx).await.unwrap();
        // Created after the c3 job, so only the name ordering puts it first.
        let middle = Job::create(&tx, &NewJob::new("middle", "c2")).await.unwrap().id;
        let second = Job::create(&tx, &NewJob::new("second", "c1")).await.unwrap().id;

        let jobs = Job::find_all(&tx, &JobFilter::new()).await.unwrap();
        let ids: Vec<i32> = jobs.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![hello, second, middle, world]);

        let names: Vec<_> = jobs.iter().map(|j| j.company_name.as_deref()).collect();
        assert_eq!(names, vec![Some("C1"), Some("C1"), Some("C2"), Some("C3")]);
    });
}

#[tokio::test]
async fn find_all_with_every_filter() {
    with_tx!(tx, {
        let (_, world) = seed(&tx).await.unwrap();
        let filter = JobFilter::new().title("World").min_salary(20000).has_equity(true);
        let jobs = Job::find_all(&tx, &filter).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, world);
    });
}

#[tokio::test]
async fn false_equity_filter_keeps_zero_equity_jobs() {
    with_tx!(tx, {
        let (hello, _) = seed(&tx).await.unwrap();
        let filter = JobFilter::new().title("hello").min_salary(1).has_equity(false);
        let jobs = Job::find_all(&tx, &filter).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, hello);
    });
}

#[tokio::test]
async fn get_and_not_found() {
    with_tx!(tx, {
        let (hello, _) = seed(&tx).await.unwrap();
        let job = Job::get(&tx, hello).await.unwrap();
        assert_eq!(job.title, "hello");
        assert_eq!(job.company_name.as_deref(), Some("C1"));

        let err = Job::get(&tx, 9_999_999).await.unwrap_err();
        assert!(err.is_not_found());
    });
}

#[tokio::test]
async fn update_changes_only_given_fields() {
    with_tx!(tx, {
        let (hello, _) = seed(&tx).await.unwrap();
        let job = Job::update(&tx, hello, &JobPatch::new().title("New").equity(dec("0.4")))
            .await
            .unwrap();
        assert_eq!(job.title, "New");
        assert_eq!(job.salary, Some(45000));
        assert_eq!(job.equity, Some(dec("0.4")));
        assert_eq!(job.company_handle, "c1");
    });
}

#[tokio::test]
async fn update_errors() {
    with_tx!(tx, {
        let (hello, _) = seed(&tx).await.unwrap();

        let err = Job::update(&tx, 9_999_999, &JobPatch::new().title("nope"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = Job::update(&tx, hello, &JobPatch::new()).await.unwrap_err();
        assert!(err.is_bad_request());
    });
}

#[tokio::test]
async fn remove_and_not_found() {
    with_tx!(tx, {
        let (hello, _) = seed(&tx).await.unwrap();
        Job::remove(&tx, hello).await.unwrap();
        assert!(Job::get(&tx, hello).await.unwrap_err().is_not_found());
        assert!(Job::remove(&tx, hello).await.unwrap_err().is_not_found());
    });
}

#[tokio::test]
async fn json_update_binds_to_column_types() {
    with_tx!(tx, {
        let (hello, _) = seed(&tx).await.unwrap();
        let serde_json::Value::Object(body) = serde_json::json!({"salary": 50000.0, "title": 5})
        else {
            unreachable!()
        };
        let mut clause =
            build_set_clause(&UpdateRecord::from_json(body).unwrap(), &ColumnMap::identity())
                .unwrap();
        let id_idx = clause.push_key(hello);
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING salary, title",
            clause.set_cols, id_idx
        );

        let row = tx.query_one(&sql, &params_ref(&clause.values)).await.unwrap();
        assert_eq!(row.get::<_, Option<i32>>("salary"), Some(50000));
        assert_eq!(row.get::<_, String>("title"), "5");
    });
}

#[tokio::test]
async fn uncoercible_value_is_bad_request() {
    with_tx!(tx, {
        let (hello, _) = seed(&tx).await.unwrap();
        let values = [SqlValue::Float(0.5), SqlValue::from(hello)];
        let err = GenericClient::query(
            &tx,
            "UPDATE jobs SET salary = $1 WHERE id = $2",
            &params_ref(&values),
        )
        .await
        .unwrap_err();
        assert!(err.is_bad_request(), "{err:?}");
        assert!(err.is_client_error());
    });
}
