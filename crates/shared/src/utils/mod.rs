mod context;
mod logs;
mod metrics;
mod otel;

pub use self::context::{CancelHandle, ContextError, RequestContext};
pub use self::logs::init_logger;
pub use self::metrics::{DynMetricsSink, Labels, Method, Metrics, MetricsSink, NoopMetrics, Status};
pub use self::otel::{Instrumentation, Telemetry, TracingContext};
