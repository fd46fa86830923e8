// Built-in catalog for the C standard library, POSIX and iostreams

use crate::features::taint_analysis::domain::{
    ArgPosition::{self, Arg, ArgsFrom, Receiver, Return},
    DiagnosticKind, PropagatorRule, SinkRule, SourceRule,
};

const SOURCES: &[(&str, &[ArgPosition])] = &[
    // Formatted scan: outputs only, never the format string
    ("scanf", &[ArgsFrom(1)]),
    ("vscanf", &[ArgsFrom(1)]),
    ("fscanf", &[ArgsFrom(2)]),
    ("sscanf", &[ArgsFrom(2)]),
    ("vfscanf", &[ArgsFrom(2)]),
    // Raw reads into a destination buffer
    ("read", &[Arg(1)]),
    ("recv", &[Arg(1)]),
    ("recvfrom", &[Arg(1)]),
    ("pread", &[Arg(1)]),
    ("fread", &[Arg(0)]),
    ("gets", &[Arg(0), Return]),
    ("fgets", &[Arg(0), Return]),
    ("getchar", &[Return]),
    ("fgetc", &[Return]),
    ("getc", &[Return]),
    ("getenv", &[Return]),
    // iostreams
    ("std::getline", &[Arg(1)]),
    ("std::istream::operator>>", &[ArgsFrom(0)]),
    ("std::ifstream::operator>>", &[ArgsFrom(0)]),
    ("std::istream::getline", &[Arg(0)]),
    ("std::ifstream::getline", &[Arg(0)]),
];

const PROPAGATORS: &[(&str, &[ArgPosition], &[ArgPosition])] = &[
    ("strcpy", &[Arg(1)], &[Arg(0)]),
    ("strncpy", &[Arg(1)], &[Arg(0)]),
    ("strcat", &[Arg(0), Arg(1)], &[Arg(0)]),
    ("strncat", &[Arg(0), Arg(1)], &[Arg(0)]),
    ("memcpy", &[Arg(1)], &[Arg(0)]),
    ("memmove", &[Arg(1)], &[Arg(0)]),
    ("sprintf", &[ArgsFrom(1)], &[Arg(0)]),
    ("snprintf", &[ArgsFrom(2)], &[Arg(0)]),
    ("strdup", &[Arg(0)], &[Return]),
    ("strlen", &[Arg(0)], &[Return]),
    ("atoi", &[Arg(0)], &[Return]),
    ("atol", &[Arg(0)], &[Return]),
    ("strtol", &[Arg(0)], &[Return]),
    ("strtoul", &[Arg(0)], &[Return]),
    ("std::stoi", &[Arg(0)], &[Return]),
    ("std::to_string", &[Arg(0)], &[Return]),
    ("std::string::c_str", &[Receiver], &[Return]),
    ("std::string::data", &[Receiver], &[Return]),
    ("std::string::substr", &[Receiver], &[Return]),
    ("std::string::size", &[Receiver], &[Return]),
    ("std::string::length", &[Receiver], &[Return]),
];

const FORMAT_SINKS: &[(&str, &[ArgPosition])] = &[
    ("printf", &[Arg(0)]),
    ("vprintf", &[Arg(0)]),
    ("fprintf", &[Arg(1)]),
    ("vfprintf", &[Arg(1)]),
    ("sprintf", &[Arg(1)]),
    ("vsprintf", &[Arg(1)]),
    ("dprintf", &[Arg(1)]),
    ("snprintf", &[Arg(2)]),
    ("vsnprintf", &[Arg(2)]),
];

const SYSTEM_CALL_SINKS: &[(&str, &[ArgPosition])] = &[
    ("system", &[Arg(0)]),
    ("popen", &[Arg(0)]),
    ("execl", &[Arg(0)]),
    ("execlp", &[Arg(0)]),
    ("execle", &[Arg(0)]),
    ("execv", &[Arg(0)]),
    ("execvp", &[Arg(0)]),
    ("syslog", &[Arg(1)]),
];

const BUFFER_SIZE_SINKS: &[(&str, &[ArgPosition])] = &[
    ("malloc", &[Arg(0)]),
    ("alloca", &[Arg(0)]),
    ("calloc", &[Arg(0), Arg(1)]),
    ("realloc", &[Arg(1)]),
    ("memcpy", &[Arg(2)]),
    ("memmove", &[Arg(2)]),
    ("memset", &[Arg(2)]),
    ("strncpy", &[Arg(2)]),
    ("strncat", &[Arg(2)]),
];

pub fn sources() -> Vec<SourceRule> {
    SOURCES
        .iter()
        .map(|(name, taints)| SourceRule::new(name, taints))
        .collect()
}

pub fn propagators() -> Vec<PropagatorRule> {
    PROPAGATORS
        .iter()
        .map(|(name, from, to)| PropagatorRule::new(name, from, to))
        .collect()
}

pub fn sinks() -> Vec<SinkRule> {
    let classes = [
        (FORMAT_SINKS, DiagnosticKind::UncontrolledFormatString),
        (SYSTEM_CALL_SINKS, DiagnosticKind::UntrustedSystemCall),
        (BUFFER_SIZE_SINKS, DiagnosticKind::UntrustedBufferSize),
    ];
    classes
        .iter()
        .flat_map(|(table, kind)| {
            table
                .iter()
                .map(move |(name, checks)| SinkRule::new(name, checks, *kind))
        })
        .collect()
}
