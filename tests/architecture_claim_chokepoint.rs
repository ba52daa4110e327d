use std::fs;
use std::path::{Path, PathBuf};

// Only the coordinator decides when a claim is sent; the contract client's
// own tests exercise its dry-run encoding directly.
const ALLOWED_CLAIM_CALLERS: &[&str] = &[
    "src/coordinator/coordinator.rs",
    "src/adapters/reward_contract.rs",
];

const ALLOWED_CONTRACT_CALLERS: &[&str] = &["src/adapters/reward_contract.rs"];

fn collect_rust_files(root: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rust_files(&path, out);
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) == Some("rs") {
            out.push(path);
        }
    }
}

fn find_offenders(needle: &str, allowed: &[&str]) -> Vec<String> {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut files = Vec::new();
    collect_rust_files(&repo_root.join("src"), &mut files);

    let mut offenders = Vec::new();
    for file in files {
        let rel = file
            .strip_prefix(repo_root)
            .unwrap_or(&file)
            .to_string_lossy()
            .replace('\\', "/");
        if allowed.iter().any(|a| *a == rel) {
            continue;
        }
        let content = fs::read_to_string(&file).unwrap_or_default();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.contains(needle) {
                offenders.push(format!("{rel}:{}: {}", idx + 1, trimmed));
            }
        }
    }
    offenders
}

#[test]
fn claim_transactions_only_go_through_the_coordinator() {
    let offenders = find_offenders(".claim_reward(", ALLOWED_CLAIM_CALLERS);
    assert!(
        offenders.is_empty(),
        "claim sent outside the coordinator:\n{}",
        offenders.join("\n")
    );
}

#[test]
fn reward_contract_is_only_called_by_its_client() {
    let offenders = find_offenders(".claimReward(", ALLOWED_CONTRACT_CALLERS);
    assert!(
        offenders.is_empty(),
        "direct reward contract call detected:\n{}",
        offenders.join("\n")
    );
}
