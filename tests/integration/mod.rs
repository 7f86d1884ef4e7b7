mod closing;
mod lifecycle;
mod retraction;
