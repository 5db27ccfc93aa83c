//! Longest Collatz Chain
//!
//! This example finds the starting number below a limit that produces the
//! longest Collatz sequence, written as a flowstate machine.
//!
//! Key concepts:
//! - States declared with `declare_states!` and their transition codes
//! - Handlers bound to methods with `bind_methods!`
//! - Diagnostics and input injection for the stepping shell
//! - Graphviz export of the compiled machine
//!
//! Run with: cargo run --example collatz -- [LIMIT] [--diagram | --shell]

use flowstate::core::HandlerError;
use flowstate::shell::Shell;
use flowstate::{bind_methods, declare_states};
use flowstate::{Machine, MachineInstance, MachineTypeBuilder};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io;
use tracing_subscriber::EnvFilter;

declare_states! {
    enum Collatz {
        InitMachine = "",
        AddNextProbeToStack = "",
        NextQueryInCache = "F->AQTS",
        AddResultToCache = "PQS",
        AddQueryToStack = "NQIC",
        PollQueryStack = "",
        QueryStackEmpty = "F->NQIC",
        IsNextAboveTarget = "F->ANPTS",
        CalcComplete = "0",
    }
}

fn next_collatz(n: u64) -> u64 {
    if n % 2 == 0 {
        n / 2
    } else {
        3 * n + 1
    }
}

fn sequence(mut n: u64) -> Vec<u64> {
    let mut values = vec![n];
    while n > 1 {
        n = next_collatz(n);
        values.push(n);
    }
    values
}

/// Chain lengths computed by walking a stack of pending queries.
///
/// A query whose successor is not cached yet is parked on the stack while
/// the successor is computed first.
struct ChainSearch {
    target: u64,
    lengths: BTreeMap<u64, u64>,
    pending: BTreeSet<u64>,
    queries: VecDeque<u64>,
}

impl ChainSearch {
    fn new(target: u64) -> Self {
        Self {
            target,
            lengths: BTreeMap::new(),
            pending: BTreeSet::new(),
            queries: VecDeque::new(),
        }
    }

    fn top(&self) -> Result<u64, HandlerError> {
        self.queries
            .front()
            .copied()
            .ok_or_else(|| HandlerError::new("query stack is empty"))
    }

    fn init_machine(&mut self) {
        self.lengths.insert(1, 1);
        self.pending.extend(2..self.target + 100);
    }

    fn add_next_probe_to_stack(&mut self) -> Result<(), HandlerError> {
        let probe = self
            .pending
            .first()
            .copied()
            .ok_or_else(|| HandlerError::new("no numbers left to probe"))?;
        self.queries.push_back(probe);
        Ok(())
    }

    fn next_query_in_cache(&self) -> Result<bool, HandlerError> {
        Ok(self.lengths.contains_key(&next_collatz(self.top()?)))
    }

    fn add_result_to_cache(&mut self) -> Result<(), HandlerError> {
        let query = self.top()?;
        let length = self
            .lengths
            .get(&next_collatz(query))
            .copied()
            .ok_or_else(|| HandlerError::new(format!("successor of {query} is not cached")))?;
        self.lengths.insert(query, length + 1);
        self.pending.remove(&query);
        Ok(())
    }

    fn add_query_to_stack(&mut self) -> Result<(), HandlerError> {
        let next = next_collatz(self.top()?);
        self.queries.push_front(next);
        Ok(())
    }

    fn poll_query_stack(&mut self) {
        self.queries.pop_front();
    }

    fn query_stack_empty(&self) -> bool {
        self.queries.is_empty()
    }

    fn is_next_above_target(&self) -> bool {
        self.pending.first().map_or(true, |&next| next > self.target)
    }

    /// Start value with the longest chain; the smallest wins ties.
    fn longest(&self) -> Option<(u64, u64)> {
        self.lengths
            .iter()
            .filter(|(n, _)| **n <= self.target)
            .fold(None, |best: Option<(u64, u64)>, (&n, &len)| match best {
                Some((_, best_len)) if best_len >= len => best,
                _ => Some((n, len)),
            })
    }
}

impl Machine for ChainSearch {
    fn define(builder: MachineTypeBuilder<Self>) -> MachineTypeBuilder<Self> {
        let builder = builder.name("ChainSearch").states(Collatz::DECLARATIONS);
        bind_methods!(builder, ChainSearch {
            action InitMachine,
            try_action AddNextProbeToStack,
            try_decision NextQueryInCache,
            try_action AddResultToCache,
            try_action AddQueryToStack,
            action PollQueryStack,
            decision QueryStackEmpty,
            decision IsNextAboveTarget,
        })
    }

    fn diagnostics(&self) -> Vec<String> {
        vec![
            format!("Cache Size: {}", self.lengths.len()),
            format!(
                "Top Cache Value: {}",
                self.lengths.keys().next_back().map_or(-1, |&n| n as i64)
            ),
            format!("Stack Size: {}", self.queries.len()),
            format!("Stack: {:?}", self.queries),
        ]
    }

    fn inject(&mut self, _state: &str, input: &str) -> Result<(), HandlerError> {
        let n: u64 = input
            .trim()
            .parse()
            .map_err(|_| HandlerError::new(format!("expected a number, got '{input}'")))?;
        self.pending.insert(n);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut target = 100;
    let mut diagram = false;
    let mut shell = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--diagram" => diagram = true,
            "--shell" => shell = true,
            other => target = other.parse()?,
        }
    }

    if diagram {
        print!("{}", ChainSearch::machine_type()?.to_dot());
        return Ok(());
    }

    let mut run = MachineInstance::new(ChainSearch::new(target))?;

    if shell {
        let stdin = io::stdin();
        Shell::new(&mut run).run(stdin.lock(), io::stdout())?;
    } else {
        run.run_to_completion()?;
    }

    println!("Finished in state {} after {} steps", run.state_name(), run.step_count());
    match run.data().longest() {
        Some((n, length)) => {
            println!("Result is {n} (chain length {length})");
            let chain: Vec<String> = sequence(n).iter().map(u64::to_string).collect();
            println!("{}", chain.join("->"));
        }
        None => println!("No chains computed yet"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_longest_chain_below_one_hundred() {
        let mut run = MachineInstance::new(ChainSearch::new(100)).unwrap();
        run.run_to_completion().unwrap();

        assert_eq!(run.state_name(), "CalcComplete");
        assert_eq!(run.data().longest(), Some((97, 119)));
    }

    #[test]
    fn machine_type_is_named_and_exports_a_graph() {
        let machine = ChainSearch::machine_type().unwrap();
        assert_eq!(machine.name(), "ChainSearch");

        let dot = machine.to_dot().to_string();
        assert!(dot.starts_with("digraph ChainSearch { \n"));
        assert!(dot.contains("NextQueryInCache->AddQueryToStack [label=\"F\"];\n"));
    }

    #[test]
    fn lengths_agree_with_direct_walk() {
        let mut run = MachineInstance::new(ChainSearch::new(30)).unwrap();
        run.run_to_completion().unwrap();

        for n in 1..=30 {
            assert_eq!(run.data().lengths[&n], sequence(n).len() as u64);
        }
    }
}
