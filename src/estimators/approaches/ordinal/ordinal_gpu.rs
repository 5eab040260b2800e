// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// GPU-accelerated pattern counting for the permutation entropy map.
// This module is compiled only when the `gpu_support` feature is enabled.

#![cfg(feature = "gpu_support")]

use std::ops::Range;

use futures_intrusive::channel::shared::oneshot_channel;
use ndarray::{Array2, ArrayView2, s};
use pollster::block_on;
use tracing::debug;
use wgpu::util::DeviceExt;

use crate::estimators::approaches::ordinal::ordinal::{normalization, shannon_entropy};
use crate::estimators::approaches::ordinal::ordinal_utils::{symbolize_series, window_count};
use crate::estimators::config::PermutationEntropyMapConfig;

/// Largest number of histogram bins per row.
const MAX_BINS: u32 = 4096;
const WORKGROUP_SIZE: u32 = 256;
const MAX_WORKGROUPS: u32 = 65_535;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct HistogramConfig {
    rows: u32,
    cols: u32,
    min_code: i32,
    bins: u32,
}

/// Entropy of every `(row, window)` computed from GPU pattern histograms.
///
/// Applies only when all windows have the same length and are long enough for at
/// least one pattern; returns None otherwise, or on any GPU error, and the caller
/// falls back to the CPU path.
pub fn gpu_window_entropies(
    x: ArrayView2<'_, f64>,
    windows: &[Range<usize>],
    config: &PermutationEntropyMapConfig,
) -> Option<Vec<Vec<f64>>> {
    let first = windows.first()?;
    let len = first.len();
    if windows.iter().any(|w| w.len() != len) {
        return None;
    }
    let (dim, tau) = (config.entropy.dim, config.entropy.tau);
    // Lehmer codes of dim <= 12 fit into i32.
    if dim > 12 {
        return None;
    }
    let n_codes = window_count(len, dim, tau).ok()?;

    let n_rows = x.nrows();
    let n_windows = windows.len();
    let mut codes = Array2::<i32>::zeros((n_rows * n_windows, n_codes));
    for (row, series) in x.outer_iter().enumerate() {
        for (w, range) in windows.iter().enumerate() {
            let symbols = symbolize_series(series.slice(s![range.clone()]), dim, tau).ok()?;
            for (dst, &c) in codes.row_mut(row * n_windows + w).iter_mut().zip(symbols.iter()) {
                *dst = c as i32;
            }
        }
    }

    let counts = histogram_rows(&codes)?;
    debug!(segments = counts.len(), "Pattern histograms computed on GPU");

    let base = config.entropy.base;
    let scale = normalization(dim, base, config.entropy.normalized);
    let n_f = n_codes as f64;
    let entropies: Vec<f64> = counts
        .iter()
        .map(|row| shannon_entropy(row.iter().map(|&c| c as f64 / n_f), base) / scale)
        .collect();
    Some(entropies.chunks(n_windows).map(<[f64]>::to_vec).collect())
}

/// Dense histogram of every row of `codes`, as non-zero bin counts per row.
fn histogram_rows(codes: &Array2<i32>) -> Option<Vec<Vec<u32>>> {
    let (rows, cols) = codes.dim();
    if rows == 0 || cols == 0 {
        return Some(Vec::new());
    }

    let min_code = *codes.iter().min()?;
    let max_code = *codes.iter().max()?;
    let bins = (max_code - min_code) as u32 + 1;
    let total = (rows * cols) as u32;
    let wg_count = total.div_ceil(WORKGROUP_SIZE);
    if bins > MAX_BINS || wg_count > MAX_WORKGROUPS {
        return None;
    }

    let flat: Vec<i32> = codes.iter().copied().collect();

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .ok()?;
    let (device, queue) = block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("Pattern Histogram Device"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::default(),
        memory_hints: wgpu::MemoryHints::default(),
        trace: wgpu::Trace::default(),
    }))
    .ok()?;

    let out_size = (rows as u64) * (bins as u64) * std::mem::size_of::<u32>() as u64;
    let codes_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Pattern Codes"),
        contents: bytemuck::cast_slice(&flat),
        usage: wgpu::BufferUsages::STORAGE,
    });
    let counts_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Pattern Counts"),
        size: out_size,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    });
    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Pattern Counts Readback"),
        size: out_size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let cfg = HistogramConfig {
        rows: rows as u32,
        cols: cols as u32,
        min_code,
        bins,
    };
    let config_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Pattern Histogram Config"),
        contents: bytemuck::bytes_of(&cfg),
        usage: wgpu::BufferUsages::UNIFORM,
    });

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Pattern Histogram Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("pattern_histogram.wgsl").into()),
    });

    let storage = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };
    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Pattern Histogram Layout"),
        entries: &[
            storage(0, true),
            storage(1, false),
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    });
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Pattern Histogram Pipeline Layout"),
        bind_group_layouts: &[&layout],
        push_constant_ranges: &[],
    });
    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("Pattern Histogram Pipeline"),
        layout: Some(&pipeline_layout),
        module: &shader,
        entry_point: Some("main"),
        compilation_options: wgpu::PipelineCompilationOptions::default(),
        cache: None,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Pattern Histogram Bind Group"),
        layout: &layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: codes_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: counts_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: config_buffer.as_entire_binding(),
            },
        ],
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Pattern Histogram Encoder"),
    });
    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Pattern Histogram Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(wg_count, 1, 1);
    }
    encoder.copy_buffer_to_buffer(&counts_buffer, 0, &readback, 0, out_size);
    queue.submit(std::iter::once(encoder.finish()));

    let slice = readback.slice(..);
    let (sender, receiver) = oneshot_channel();
    slice.map_async(wgpu::MapMode::Read, move |v| {
        sender.send(v).ok();
    });
    device.poll(wgpu::PollType::Wait).ok()?;
    block_on(receiver.receive())?.ok()?;
    let view = slice.get_mapped_range();
    let dense: Vec<u32> = bytemuck::cast_slice(&view).to_vec();
    drop(view);
    readback.unmap();

    Some(
        dense
            .chunks(bins as usize)
            .map(|row| row.iter().copied().filter(|&c| c != 0).collect())
            .collect(),
    )
}
