//! The seam to a native OpenCL layer.
//!
//! Compiling and launching kernels happens outside this crate. A
//! [`KernelRuntime`] receives translated source plus packed buffers; writable
//! buffers are updated in place by `launch`.

use gpgpu_codegen::{
    translate_function_with, KernelArtifact, KernelDescriptor, KernelParam, TranslateOptions,
};
use gpgpu_types::Value;

use crate::{pack_arguments, ArgBuffer, DriverError};

pub trait KernelRuntime {
    /// Compiled program, as the runtime represents it.
    type Handle;

    fn compile(&mut self, artifact: &KernelArtifact) -> Result<Self::Handle, DriverError>;

    fn launch(
        &mut self,
        handle: &Self::Handle,
        work_sizes: &[usize],
        group_sizes: &[usize],
        buffers: &mut [ArgBuffer],
    ) -> Result<(), DriverError>;
}

/// Translation plus a runtime.
pub struct Gpgpu<R: KernelRuntime> {
    runtime: R,
    options: TranslateOptions,
}

impl<R: KernelRuntime> Gpgpu<R> {
    pub fn new(runtime: R) -> Self {
        Self::with_options(runtime, TranslateOptions::default())
    }

    pub fn with_options(runtime: R, options: TranslateOptions) -> Self {
        Gpgpu { runtime, options }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Translate and compile a kernel.
    pub fn create_kernel(
        &mut self,
        descriptor: &KernelDescriptor,
    ) -> Result<Kernel<'_, R>, DriverError> {
        let artifact = translate_function_with(descriptor, &self.options)?;
        let handle = self.runtime.compile(&artifact)?;
        tracing::debug!(params = descriptor.params.len(), "compiled kernel");
        Ok(Kernel {
            runtime: &mut self.runtime,
            handle,
            params: descriptor.params.clone(),
            artifact,
            work_sizes: Vec::new(),
            group_sizes: Vec::new(),
        })
    }
}

/// A compiled kernel bound to its runtime.
pub struct Kernel<'r, R: KernelRuntime> {
    runtime: &'r mut R,
    handle: R::Handle,
    params: Vec<KernelParam>,
    artifact: KernelArtifact,
    work_sizes: Vec<usize>,
    group_sizes: Vec<usize>,
}

impl<R: KernelRuntime> Kernel<'_, R> {
    pub fn artifact(&self) -> &KernelArtifact {
        &self.artifact
    }

    /// Set the global work size and, optionally, the work-group size.
    ///
    /// Without a group size every dimension uses groups of 1.
    pub fn set_size(
        &mut self,
        work: &[usize],
        group: Option<&[usize]>,
    ) -> Result<&mut Self, DriverError> {
        if !(1..=3).contains(&work.len()) {
            return Err(DriverError::WorkDimensions(work.len()));
        }
        let group = match group {
            Some(group) if group.len() != work.len() => {
                return Err(DriverError::GroupDimensions {
                    work: work.len(),
                    group: group.len(),
                })
            }
            Some(group) => group.to_vec(),
            None => vec![1; work.len()],
        };
        self.work_sizes = work.to_vec();
        self.group_sizes = group;
        Ok(self)
    }

    /// Pack `args`, launch, and return the buffers as the runtime left them.
    pub fn call(&mut self, args: &[Value]) -> Result<Vec<ArgBuffer>, DriverError> {
        if self.work_sizes.is_empty() {
            return Err(DriverError::MissingWorkSize);
        }
        let mut buffers = pack_arguments(&self.params, args)?;
        self.runtime.launch(
            &self.handle,
            &self.work_sizes,
            &self.group_sizes,
            &mut buffers,
        )?;
        Ok(buffers)
    }
}
