//! Stress Tests - independent clients in parallel
//!
//! Clients share nothing but the server, so these tests run many of them on
//! blocking worker threads at once and check that:
//! - Every call decodes the same data it would decode alone
//! - No call observes another call's reply
//! - Throughput holds up with simulated transport latency

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::Barrier;

use common::*;
use msrpc::mslsad::LsarLookupNamesRequest;
use msrpc::mssamr::{SamrGetMembersInAliasRequest, SamrQueryInformationDomainRequest};
use msrpc::RpcClient;

/// One mixed workload call, checked against the fixture
fn run_mixed_call(client: &mut RpcClient<LoopbackTransport>, directory: &MockDirectory, step: usize) -> Result<(), String> {
    match step % 4 {
        0 => {
            let lookup = client
                .call(&LsarLookupNamesRequest::new(policy_handle(), ["alice", "nobody"]))
                .map_err(|e| e.to_string())?
                .into_payload();
            if lookup.mapped_count() != 1 || lookup.translated_sids()[0].relative_id != 1104 {
                return Err(format!("lookup mismatch: {:?}", lookup.translated_sids()));
            }
        }
        1 => {
            let users = enumerate_all_users(client).map_err(|e| e.to_string())?;
            if users.len() != directory.users().len() {
                return Err(format!("expected {} users, got {}", directory.users().len(), users.len()));
            }
        }
        2 => {
            let info = client
                .call(&SamrQueryInformationDomainRequest::lockout(domain_handle()))
                .map_err(|e| e.to_string())?
                .into_payload();
            if info.lockout() != Some(&MockDirectory::lockout_info()) {
                return Err(format!("lockout mismatch: {:?}", info.buffer()));
            }
        }
        _ => {
            let members = client
                .call(&SamrGetMembersInAliasRequest::new(alias_handle()))
                .map_err(|e| e.to_string())?
                .into_payload();
            if members.members().len() != directory.alias_members().len() {
                return Err("member count mismatch".to_string());
            }
        }
    }
    Ok(())
}

/// Test: Many clients issuing mixed calls simultaneously
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_high_concurrency_many_clients() {
    init_logging();

    const NUM_CLIENTS: usize = 32;
    const CALLS_PER_CLIENT: usize = 40;

    let directory = Arc::new(MockDirectory::new());
    let stats = Arc::new(ConcurrentStats::new());
    let barrier = Arc::new(Barrier::new(NUM_CLIENTS));

    let mut handles = Vec::new();
    for client_id in 0..NUM_CLIENTS {
        let directory = directory.clone();
        let stats = stats.clone();
        let barrier = barrier.clone();

        handles.push(tokio::spawn(async move {
            barrier.wait().await;

            tokio::task::spawn_blocking(move || {
                let mut client = RpcClient::new(LoopbackTransport::new(directory.clone()));
                for step in 0..CALLS_PER_CLIENT {
                    let start = Instant::now();
                    match run_mixed_call(&mut client, &directory, client_id + step) {
                        Ok(()) => stats.record_success(start.elapsed()),
                        Err(e) => {
                            eprintln!("Client {} step {} failed: {}", client_id, step, e);
                            stats.record_failure();
                        }
                    }
                }
            })
            .await
        }));
    }

    for result in join_all(handles).await {
        result.unwrap().unwrap();
    }

    let total = (NUM_CLIENTS * CALLS_PER_CLIENT) as u64;
    println!("\n=== High Concurrency Test Results ===");
    println!("Total calls: {}", total);
    println!("Successful: {}", stats.success_count());
    println!("Avg latency: {:?}", stats.avg_latency());
    println!("Max latency: {:?}", stats.max_latency());

    assert_eq!(stats.failure_count(), 0);
    assert_eq!(stats.success_count(), total);
    // user enumeration takes three calls per pass at the default page size
    assert_eq!(directory.call_count(), NUM_CLIENTS * CALLS_PER_CLIENT / 4 * 6);
}

/// Test: Slow transports do not serialize unrelated clients
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_clients_with_latency() {
    init_logging();

    const NUM_CLIENTS: usize = 8;
    const LATENCY: Duration = Duration::from_millis(20);

    let directory = Arc::new(MockDirectory::new());
    let start = Instant::now();

    let handles = (0..NUM_CLIENTS).map(|_| {
        let directory = directory.clone();
        tokio::task::spawn_blocking(move || {
            let transport = LoopbackTransport::new(directory).with_latency(LATENCY);
            let mut client = RpcClient::new(transport);
            client
                .call(&SamrQueryInformationDomainRequest::password(domain_handle()))
                .map(|response| response.into_payload())
        })
    });

    let results = join_all(handles).await;
    let elapsed = start.elapsed();

    for result in results {
        let info = result.unwrap().unwrap();
        assert_eq!(info.password(), Some(&MockDirectory::password_info()));
    }
    println!("{} clients with {:?} latency finished in {:?}", NUM_CLIENTS, LATENCY, elapsed);
    assert!(elapsed < LATENCY * NUM_CLIENTS as u32, "calls ran serially: {:?}", elapsed);
}
