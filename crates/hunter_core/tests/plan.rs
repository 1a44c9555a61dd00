use std::net::IpAddr;

use hunter_core::{expand, ProbeTask, Scheme, WorkPlan};

#[test]
fn tasks_are_address_major_then_domain_then_scheme() {
    let addresses = expand(["10.0.0.1-10.0.0.2"]).unwrap();
    let plan = WorkPlan::new(addresses, vec!["a.example".into(), "b.example".into()]);

    let tasks: Vec<(IpAddr, String, Scheme)> = plan
        .tasks()
        .map(|ProbeTask { address, domain, scheme }| (address, domain.to_string(), scheme))
        .collect();

    let a1: IpAddr = "10.0.0.1".parse().unwrap();
    let a2: IpAddr = "10.0.0.2".parse().unwrap();
    assert_eq!(
        tasks,
        vec![
            (a1, "a.example".into(), Scheme::Https),
            (a1, "a.example".into(), Scheme::Http),
            (a1, "b.example".into(), Scheme::Https),
            (a1, "b.example".into(), Scheme::Http),
            (a2, "a.example".into(), Scheme::Https),
            (a2, "a.example".into(), Scheme::Http),
            (a2, "b.example".into(), Scheme::Https),
            (a2, "b.example".into(), Scheme::Http),
        ]
    );
    assert_eq!(plan.total(), 8);
}

#[test]
fn total_is_addresses_times_domains_times_two() {
    let addresses = expand(["192.168.0.0/24", "10.1.1.1"]).unwrap();
    let plan = WorkPlan::new(addresses, vec!["x.example".into(), "y.example".into(), "z.example".into()]);
    assert_eq!(plan.total(), 257 * 3 * 2);
    assert_eq!(plan.tasks().count() as u64, plan.total());
}
