use anyhow::{anyhow, bail, Context, Result};
use physoce::kernel::KernelLifecycle;
use physoce::signal::traits::{LombScargle1D, WindowGenerate};
use physoce::signal::windows::{WindowBuilderOwned, WindowConfig, WindowKernel};
use physoce::signal::{LombScargleConfig, LombScargleKernel, LombScargleResult, Scaling};
use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const DEFAULT_PYTHON_BIN: &str = "python";

const PY_REFERENCE_SCRIPT: &str = r#"
import json
import sys
import time
import numpy as np
import scipy.signal

env = json.loads(sys.stdin.read())
op = env["op"]
iters = int(env["iters"])
p = env["payload"]

def _window(name):
    return tuple(name) if isinstance(name, list) else name

def _lombscargle():
    t = np.asarray(p["t"], dtype=float)
    x = np.asarray(p["x_re"], dtype=float) + 1j * np.asarray(p["x_im"], dtype=float)
    n = len(x)
    w = scipy.signal.get_window(_window(p["window"]), n)
    x = x * w / np.sum(w) * n
    dt = np.mean(np.diff(t))
    flo = (1 / dt) / (n * p["ofac"])
    fhi = p["hifac"] * (1 / (2 * dt))
    f = np.arange(flo, fhi + flo, flo)
    if p["return_zero"]:
        f = np.concatenate([[0.0], f])
    if not p["return_onesided"] or np.any(np.imag(x) != 0):
        pos = f[1:] if p["return_zero"] else f
        f = np.concatenate([-pos[::-1], f])
    t0 = t[0] if p["t0"] is None else p["t0"]
    coeffs = np.empty(len(f), dtype=complex)
    for k, fk in enumerate(f):
        if fk == 0:
            coeffs[k] = np.sum(x) / np.sqrt(n)
            continue
        wk = 2 * np.pi * fk
        tau = np.arctan2(np.sum(np.sin(2 * wk * t)), np.sum(np.cos(2 * wk * t))) / (2 * wk)
        arg = wk * (t - tau)
        a = np.sum(np.cos(arg) ** 2) ** -0.5
        b = np.sum(np.sin(arg) ** 2) ** -0.5
        f0 = np.sqrt(n / 2) * np.exp(-1j * wk * t0)
        coeffs[k] = f0 * np.sum(x * (a * np.cos(arg) - 1j * b * np.sin(arg)))
    px = np.abs(coeffs) ** 2 / n
    if p["scaling"] == "density":
        px = px * dt
    return np.concatenate([f, coeffs.real, coeffs.imag, px])

def _compute():
    if op == "lombscargle":
        return _lombscargle()
    if op == "get_window":
        return scipy.signal.get_window(_window(p["window"]), int(p["nx"]), fftbins=bool(p["fftbins"]))
    raise RuntimeError(f"unsupported op: {op}")

y = np.asarray(_compute(), dtype=float).reshape(-1)

t0 = time.perf_counter_ns()
for _ in range(iters):
    _compute()
t1 = time.perf_counter_ns()

print(json.dumps({
    "output": y.tolist(),
    "avg_ns": (t1 - t0) / max(iters, 1),
    "python_version": sys.version.split()[0],
    "numpy_version": np.__version__,
    "scipy_version": scipy.__version__,
}))
"#;

#[derive(Debug, Serialize, Deserialize, Clone)]
struct PythonEval {
    output: Vec<f64>,
    avg_ns: f64,
    python_version: String,
    numpy_version: String,
    scipy_version: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ContractRow {
    case_id: String,
    len: usize,
    pearson_r: f64,
    mae: f64,
    rmse: f64,
    max_abs: f64,
    rust_ns: f64,
    python_ns: f64,
    speedup_vs_python: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContractBundle {
    generated_epoch_seconds: u64,
    python_executable: String,
    python_version: String,
    numpy_version: String,
    scipy_version: String,
    rows: Vec<ContractRow>,
}

/// One Lomb-Scargle contract case.
struct LombScargleCase {
    case_id: &'static str,
    config: LombScargleConfig,
    complex: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("contracts") => run_contracts(),
        _ => {
            eprintln!("Usage:");
            eprintln!("  cargo run -p xtask -- contracts");
            Ok(())
        }
    }
}

fn run_contracts() -> Result<()> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let out_dir = PathBuf::from(format!("target/contracts/{ts}"));
    fs::create_dir_all(&out_dir).context("creating contract output directory")?;

    let python_bin = detect_python_bin();
    let mut rows = Vec::new();

    // Irregular sampling shared by the estimator cases: a jittered hourly
    // clock with a gap, like a mooring record with a dropout.
    let t: Vec<f64> = (0..400)
        .filter(|i| !(150..170).contains(i))
        .map(|i| {
            let i = i as f64;
            i + 0.35 * (1.7 * i).sin() * (0.3 * i).cos()
        })
        .collect();
    let x_real: Vec<f64> = t
        .iter()
        .map(|&ti| {
            let w = 2.0 * std::f64::consts::PI;
            (w * ti / 12.42).sin() + 0.4 * (w * ti / 24.0 + 0.3).cos() + 0.05 * (w * ti / 3.1).sin()
        })
        .collect();
    let x_complex: Vec<Complex<f64>> = t
        .iter()
        .zip(x_real.iter())
        .map(|(&ti, &xr)| {
            Complex::new(xr, 0.7 * (2.0 * std::f64::consts::PI * ti / 12.42).cos())
        })
        .collect();

    let cases = [
        LombScargleCase {
            case_id: "lombscargle_default",
            config: LombScargleConfig::default(),
            complex: false,
        },
        LombScargleCase {
            case_id: "lombscargle_hann_zero_density",
            config: LombScargleConfig {
                window: WindowBuilderOwned::Hann,
                return_zero: true,
                scaling: Scaling::Density,
                ..LombScargleConfig::default()
            },
            complex: false,
        },
        LombScargleCase {
            case_id: "lombscargle_twosided_hifac2",
            config: LombScargleConfig {
                ofac: 1.0,
                hifac: 2.0,
                return_onesided: false,
                t0: Some(-10.0),
                ..LombScargleConfig::default()
            },
            complex: false,
        },
        LombScargleCase {
            case_id: "lombscargle_complex_hamming",
            config: LombScargleConfig {
                window: WindowBuilderOwned::Hamming,
                return_zero: true,
                ..LombScargleConfig::default()
            },
            complex: true,
        },
    ];

    for case in cases {
        let kernel = LombScargleKernel::try_new(case.config.clone())?;
        let (x_re, x_im): (Vec<f64>, Vec<f64>) = if case.complex {
            x_complex.iter().map(|c| (c.re, c.im)).unzip()
        } else {
            (x_real.clone(), vec![0.0; x_real.len()])
        };

        let run = || -> Result<LombScargleResult> {
            let out = if case.complex {
                kernel.run_alloc(t.as_slice(), x_complex.as_slice())
            } else {
                kernel.run_alloc(t.as_slice(), x_real.as_slice())
            };
            out.map_err(|e| anyhow!("{} execution failed: {e}", case.case_id))
        };
        let candidate = flatten_lombscargle(&run()?);
        let py = python_eval(
            &python_bin,
            "lombscargle",
            json!({
                "t": t,
                "x_re": x_re,
                "x_im": x_im,
                "ofac": case.config.ofac,
                "hifac": case.config.hifac,
                "t0": case.config.t0,
                "return_onesided": case.config.return_onesided,
                "return_zero": case.config.return_zero,
                "window": case.config.window.name(),
                "scaling": case.config.scaling.to_string(),
            }),
            5,
        )?;
        let rust_ns = benchmark_avg_ns(20, || run().map(|_| ()))?;
        record_case(&mut rows, case.case_id, candidate, py, rust_ns)?;
    }

    for (case_id, builder, name) in [
        ("window_hann_periodic", WindowBuilderOwned::Hann, json!("hann")),
        (
            "window_kaiser_periodic",
            WindowBuilderOwned::Kaiser { beta: 8.6 },
            json!(["kaiser", 8.6]),
        ),
        ("window_nuttall_periodic", WindowBuilderOwned::Nuttall, json!("nuttall")),
    ] {
        let nx = 381;
        let kernel = WindowKernel::try_new(WindowConfig {
            builder,
            nx,
            fftbins: Some(true),
            normalize: false,
        })?;
        let candidate: Vec<f64> = kernel
            .run_alloc()
            .map_err(|e| anyhow!("{case_id} execution failed: {e}"))?;
        let py = python_eval(
            &python_bin,
            "get_window",
            json!({ "window": name, "nx": nx, "fftbins": true }),
            200,
        )?;
        let rust_ns = benchmark_avg_ns(200, || {
            kernel
                .run_alloc()
                .map(|_| ())
                .map_err(|e| anyhow!("{case_id} benchmark failed: {e}"))
        })?;
        record_case(&mut rows, case_id, candidate, py, rust_ns)?;
    }

    let versions = python_eval(
        &python_bin,
        "get_window",
        json!({ "window": "boxcar", "nx": 2, "fftbins": true }),
        0,
    )?;
    let bundle = ContractBundle {
        generated_epoch_seconds: ts,
        python_executable: python_bin.to_string_lossy().into_owned(),
        python_version: versions.python_version,
        numpy_version: versions.numpy_version,
        scipy_version: versions.scipy_version.unwrap_or_default(),
        rows,
    };

    write_summary_csv(&out_dir.join("summary.csv"), &bundle.rows)?;
    fs::write(
        out_dir.join("summary.json"),
        serde_json::to_vec_pretty(&bundle).context("serializing contract bundle")?,
    )
    .context("writing summary.json")?;

    log::info!("contract artifacts written to {}", out_dir.display());
    println!("Contract artifacts:");
    println!("  - {}", out_dir.join("summary.csv").display());
    println!("  - {}", out_dir.join("summary.json").display());
    println!("  - cases: {}", bundle.rows.len());

    Ok(())
}

/// Frequencies, real and imaginary coefficients, then periodogram.
fn flatten_lombscargle(out: &LombScargleResult) -> Vec<f64> {
    let mut flat = Vec::with_capacity(out.len() * 4);
    flat.extend_from_slice(&out.frequencies);
    flat.extend(out.coefficients.iter().map(|c| c.re));
    flat.extend(out.coefficients.iter().map(|c| c.im));
    flat.extend_from_slice(&out.periodogram);
    flat
}

fn detect_python_bin() -> PathBuf {
    std::env::var_os("PYTHON")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PYTHON_BIN))
}

fn python_eval(
    python_bin: &Path,
    op: &str,
    payload: serde_json::Value,
    iters: usize,
) -> Result<PythonEval> {
    let env = json!({
        "op": op,
        "iters": iters,
        "payload": payload
    });

    let mut child = Command::new(python_bin)
        .arg("-c")
        .arg(PY_REFERENCE_SCRIPT)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning python interpreter at {}", python_bin.display()))?;

    {
        let stdin = child.stdin.as_mut().context("opening python stdin")?;
        let payload_bytes = serde_json::to_vec(&env).context("serializing python payload")?;
        stdin
            .write_all(&payload_bytes)
            .context("writing payload to python stdin")?;
    }

    let output = child
        .wait_with_output()
        .context("waiting for python process")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("python execution failed: {stderr}");
    }
    let stdout = String::from_utf8(output.stdout).context("parsing python stdout utf8")?;
    let parsed: PythonEval = serde_json::from_str(stdout.trim()).context("parsing python json")?;
    Ok(parsed)
}

fn record_case(
    rows: &mut Vec<ContractRow>,
    case_id: &str,
    candidate: Vec<f64>,
    py: PythonEval,
    rust_ns: f64,
) -> Result<()> {
    if candidate.len() != py.output.len() {
        bail!(
            "case {case_id} has mismatched output lengths: rust={}, python={}",
            candidate.len(),
            py.output.len()
        );
    }

    let row = ContractRow {
        case_id: case_id.to_string(),
        len: candidate.len(),
        pearson_r: pearson(&candidate, &py.output),
        mae: mean_abs_error(&candidate, &py.output),
        rmse: root_mean_squared_error(&candidate, &py.output),
        max_abs: max_abs_error(&candidate, &py.output),
        rust_ns,
        python_ns: py.avg_ns,
        speedup_vs_python: py.avg_ns / rust_ns,
    };
    log::info!(
        "{case_id}: len={} max_abs={:.3e} speedup={:.1}x",
        row.len,
        row.max_abs,
        row.speedup_vs_python
    );
    rows.push(row);
    Ok(())
}

fn benchmark_avg_ns<F>(iters: usize, mut f: F) -> Result<f64>
where
    F: FnMut() -> Result<()>,
{
    let start = Instant::now();
    for _ in 0..iters {
        f()?;
    }
    Ok(start.elapsed().as_nanos() as f64 / iters as f64)
}

fn mean_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .sum::<f64>()
        / a.len() as f64
}

fn root_mean_squared_error(a: &[f64], b: &[f64]) -> f64 {
    (a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        / a.len() as f64)
        .sqrt()
}

fn max_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let da = *x - mean_a;
        let db = *y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        if a == b {
            1.0
        } else {
            0.0
        }
    } else {
        cov / (var_a.sqrt() * var_b.sqrt())
    }
}

fn write_summary_csv(path: &Path, rows: &[ContractRow]) -> Result<()> {
    let mut out = String::new();
    out.push_str("case_id,len,pearson_r,mae,rmse,max_abs,rust_ns,python_ns,speedup_vs_python\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{:.12},{:.12},{:.12},{:.12},{:.3},{:.3},{:.6}\n",
            row.case_id,
            row.len,
            row.pearson_r,
            row.mae,
            row.rmse,
            row.max_abs,
            row.rust_ns,
            row.python_ns,
            row.speedup_vs_python,
        ));
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}
