//! Shared-state behaviour: namespaces, maps and credentials are read from
//! many threads at once, and a credential swap never disturbs a snapshot.

use std::sync::Arc;
use std::thread;

use static_assertions::{assert_impl_all, const_assert};

use sandbox_auth::cap::CAP_COUNT;
use sandbox_auth::ns::{IdRangePair, NamespaceId};
use sandbox_auth::{
    new_credentials, Capability, CapabilitySet, Credentials, IdentityMap, Kgid, Kuid,
    TaskCapabilities, TaskCredentials, Uid, UserNamespace,
};

assert_impl_all!(CapabilitySet: Send, Sync, Copy);
assert_impl_all!(TaskCapabilities: Send, Sync, Copy);
assert_impl_all!(IdentityMap: Send, Sync, Clone);
assert_impl_all!(UserNamespace: Send, Sync);
assert_impl_all!(NamespaceId: Send, Sync, Copy);
assert_impl_all!(Credentials: Send, Sync, Clone);
assert_impl_all!(TaskCredentials: Send, Sync);
const_assert!(CAP_COUNT <= 64);

const THREADS: usize = 8;

fn nested() -> (Arc<UserNamespace>, Arc<UserNamespace>) {
    let root = UserNamespace::new_root();
    let ranges = [
        IdRangePair::new(0, 100_000, 1000),
        IdRangePair::new(5000, 200_000, 10),
    ];
    let child = root.new_child(Kuid::ROOT, Kgid::ROOT, &ranges, &ranges).unwrap();
    let inner = [IdRangePair::new(0, 10, 50)];
    let grandchild = child.new_child(Kuid(100_000), Kgid(100_000), &inner, &inner).unwrap();
    (child, grandchild)
}

#[test]
fn parallel_lookups_match_sequential() {
    let (_child, grandchild) = nested();
    let probes: Vec<u32> = (0..100).chain(4990..5020).collect();

    let expected: Vec<Option<Kuid>> = probes
        .iter()
        .map(|&id| grandchild.map_to_kuid(Uid(id)))
        .collect();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let ns = Arc::clone(&grandchild);
            let probes = probes.clone();
            thread::spawn(move || {
                probes
                    .iter()
                    .map(|&id| ns.map_to_kuid(Uid(id)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    assert_eq!(expected[0], Some(Kuid(100_010)));
    assert_eq!(expected[60], None);
}

#[test]
fn parallel_map_lookups() {
    let map = Arc::new(
        IdentityMap::build(&[
            IdRangePair::new(0, 1000, 10),
            IdRangePair::new(10, 500, 10),
        ])
        .unwrap(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for id in 0..20 {
                    let parent = map.translate(id).unwrap();
                    assert_eq!(map.reverse_translate(parent), Some(id));
                }
                assert_eq!(map.translate(20), None);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn snapshot_survives_capability_drop() {
    let root = UserNamespace::new_root();
    let task = Arc::new(TaskCredentials::new(Credentials::new_root(&root)));
    let before = task.snapshot();

    let dropper = {
        let task = Arc::clone(&task);
        thread::spawn(move || {
            task.update(|c| Ok(c.drop_capabilities(CapabilitySet::of(Capability::SysAdmin))))
                .unwrap();
        })
    };

    let readers: Vec<_> = (0..THREADS)
        .map(|_| {
            let task = Arc::clone(&task);
            thread::spawn(move || {
                let snap = task.snapshot();
                // Either the old or the new value, never a mix.
                assert!(snap.capabilities().is_consistent());
                snap.has_capability(Capability::Chown)
            })
        })
        .collect();

    dropper.join().unwrap();
    for reader in readers {
        assert!(reader.join().unwrap());
    }

    assert!(before.has_capability(Capability::SysAdmin));
    assert!(!task.snapshot().has_capability(Capability::SysAdmin));
    assert!(task.snapshot().has_capability(Capability::Chown));
}

#[test]
fn concurrent_updates_are_not_lost() {
    let root = UserNamespace::new_root();
    let task = Arc::new(TaskCredentials::new(Credentials::new_root(&root)));

    let handles: Vec<_> = Capability::iter()
        .take(THREADS)
        .map(|cap| {
            let task = Arc::clone(&task);
            thread::spawn(move || {
                task.update(|c| Ok(c.drop_capabilities(CapabilitySet::of(cap))))
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let now = task.snapshot();
    for cap in Capability::iter().take(THREADS) {
        assert!(!now.has_capability(cap));
    }
    assert!(now.has_capability(Capability::iter().nth(THREADS).unwrap()));
}

#[test]
fn credentials_cross_threads() {
    let (child, _) = nested();
    let creds = new_credentials(Kuid(100_000), Kgid(100_000), &[Kgid(100_004)], None, &child);

    let handle = thread::spawn(move || {
        (
            creds.user_namespace().map_from_kuid(creds.effective_kuid()),
            creds.in_group(Kgid(100_004)),
        )
    });

    assert_eq!(handle.join().unwrap(), (Some(Uid(0)), true));
}
