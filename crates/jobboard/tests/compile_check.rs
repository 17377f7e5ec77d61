//! Compile-only checks that job operations accept every supported client type.

#![allow(dead_code)]

use jobboard::{Job, JobFilter, JobPatch, JobResult, NewJob};

async fn _on_plain_client(client: &tokio_postgres::Client) -> JobResult<()> {
    let job = Job::create(client, &NewJob::new("Engineer", "c1")).await?;
    Job::get(client, job.id).await?;
    Ok(())
}

async fn _in_transaction(client: &mut tokio_postgres::Client) -> JobResult<()> {
    let tx = client.transaction().await?;
    let jobs = Job::find_all(&tx, &JobFilter::new().has_equity(true)).await?;
    for job in &jobs {
        Job::update(&tx, job.id, &JobPatch::new().salary(1)).await?;
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(feature = "pool")]
async fn _on_pooled_client(pool: &deadpool_postgres::Pool) -> JobResult<()> {
    let client = pool.get().await?;
    Job::remove(&client, 1).await?;
    Ok(())
}
