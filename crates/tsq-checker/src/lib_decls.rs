//! Embedded standard library declarations.
//!
//! The declarations are a script file bound before any project file, so
//! every name here lands in the global scope. They cover the apparent
//! members of primitives plus the handful of globals editor queries touch.

/// An embedded library file.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedLib {
    /// The lib name (e.g. "core")
    pub name: &'static str,
    /// The file name the declarations are reported under
    pub file_name: &'static str,
    /// The file content
    pub content: &'static str,
}

/// File name of the core library. Not an absolute path, so it can never
/// collide with a project file.
pub const LIB_FILE_NAME: &str = "lib.d.ts";

// =============================================================================
// Core Library
// =============================================================================

pub const LIB_CORE: EmbeddedLib = EmbeddedLib {
    name: "core",
    file_name: LIB_FILE_NAME,
    content: CORE_DECLARATIONS,
};

pub fn get_lib(name: &str) -> Option<&'static EmbeddedLib> {
    ALL_LIBS.iter().find(|lib| lib.name == name)
}

pub static ALL_LIBS: &[EmbeddedLib] = &[LIB_CORE];

const CORE_DECLARATIONS: &str = r#"
declare var NaN: number;
declare var Infinity: number;
declare var undefined: undefined;

/**
 * Converts a string to an integer.
 * @param string A string to convert into a number.
 * @param radix A value between 2 and 36 that specifies the base of the number in `string`.
 */
declare function parseInt(string: string, radix?: number): number;
/** Converts a string to a floating-point number. */
declare function parseFloat(string: string): number;
/** Returns a Boolean value that indicates whether a value is the reserved value NaN (not a number). */
declare function isNaN(number: number): boolean;
declare function isFinite(number: number): boolean;
declare function setTimeout(handler: (...args: any[]) => void, timeout?: number): number;
declare function clearTimeout(id: number | undefined): void;
declare function require(id: string): any;

type PropertyKey = string | number | symbol;

interface Object {
    /** The initial value of Object.prototype.constructor is the standard built-in Object constructor. */
    constructor: Function;
    /** Returns a string representation of an object. */
    toString(): string;
    toLocaleString(): string;
    /** Returns the primitive value of the specified object. */
    valueOf(): Object;
    /**
     * Determines whether an object has a property with the specified name.
     * @param v A property name.
     */
    hasOwnProperty(v: PropertyKey): boolean;
    isPrototypeOf(v: Object): boolean;
    propertyIsEnumerable(v: PropertyKey): boolean;
}

interface ObjectConstructor {
    new (value?: any): Object;
    (value?: any): any;
    readonly prototype: Object;
    /** Returns the names of the enumerable string properties and methods of an object. */
    keys(o: object): string[];
    values(o: object): any[];
    assign<T, U>(target: T, source: U): T & U;
    freeze<T>(o: T): T;
    create(o: object | null): any;
}

declare var Object: ObjectConstructor;

interface Function {
    /**
     * Calls the function, substituting the specified object for the this value of the function, and the specified array for the arguments of the function.
     * @param thisArg The object to be used as the this object.
     * @param argArray A set of arguments to be passed to the function.
     */
    apply(thisArg: any, argArray?: any): any;
    /**
     * Calls a method of an object, substituting another object for the current object.
     * @param thisArg The object to be used as the current object.
     * @param argArray A list of arguments to be passed to the method.
     */
    call(thisArg: any, ...argArray: any[]): any;
    /**
     * For a given function, creates a bound function that has the same body as the original function.
     * @param thisArg An object to which the this keyword can refer inside the new function.
     * @param argArray A list of arguments to be passed to the new function.
     */
    bind(thisArg: any, ...argArray: any[]): any;
    /** Returns a string representation of a function. */
    toString(): string;
    prototype: any;
    readonly length: number;
    readonly name: string;
}

interface FunctionConstructor {
    new (...args: string[]): Function;
    (...args: string[]): Function;
    readonly prototype: Function;
}

declare var Function: FunctionConstructor;

interface IArguments {
    [index: number]: any;
    length: number;
}

interface String {
    /** Returns a string representation of a string. */
    toString(): string;
    /**
     * Returns the character at the specified index.
     * @param pos The zero-based index of the desired character.
     */
    charAt(pos: number): string;
    /**
     * Returns the Unicode value of the character at the specified location.
     * @param index The zero-based index of the desired character. If there is no character at the specified index, NaN is returned.
     */
    charCodeAt(index: number): number;
    /**
     * Returns a string that contains the concatenation of two or more strings.
     * @param strings The strings to append to the end of the string.
     */
    concat(...strings: string[]): string;
    /**
     * Returns the position of the first occurrence of a substring.
     * @param searchString The substring to search for in the string
     * @param position The index at which to begin searching the String object. If omitted, search starts at the beginning of the string.
     */
    indexOf(searchString: string, position?: number): number;
    lastIndexOf(searchString: string, position?: number): number;
    includes(searchString: string, position?: number): boolean;
    startsWith(searchString: string, position?: number): boolean;
    endsWith(searchString: string, endPosition?: number): boolean;
    localeCompare(that: string): number;
    match(regexp: string | RegExp): RegExpMatchArray | null;
    replace(searchValue: string | RegExp, replaceValue: string): string;
    search(regexp: string | RegExp): number;
    /**
     * Returns a section of a string.
     * @param start The index to the beginning of the specified portion of stringObj.
     * @param end The index to the end of the specified portion of stringObj. The substring includes the characters up to, but not including, the character indicated by end.
     */
    slice(start?: number, end?: number): string;
    split(separator: string | RegExp, limit?: number): string[];
    substring(start: number, end?: number): string;
    toLowerCase(): string;
    toLocaleLowerCase(): string;
    toUpperCase(): string;
    toLocaleUpperCase(): string;
    /** Removes the leading and trailing white space and line terminator characters from a string. */
    trim(): string;
    trimStart(): string;
    trimEnd(): string;
    padStart(maxLength: number, fillString?: string): string;
    padEnd(maxLength: number, fillString?: string): string;
    repeat(count: number): string;
    /** Returns the length of a String object. */
    readonly length: number;
    /**
     * Gets a substring beginning at the specified location and having the specified length.
     * @deprecated A legacy feature for browser compatibility
     * @param from The starting position of the desired substring. The index of the first character in the string is zero.
     * @param length The number of characters to include in the returned substring.
     */
    substr(from: number, length?: number): string;
    /** Returns the primitive value of the specified object. */
    valueOf(): string;
    readonly [index: number]: string;
}

interface StringConstructor {
    new (value?: any): String;
    (value?: any): string;
    readonly prototype: String;
    fromCharCode(...codes: number[]): string;
}

/** Allows manipulation and formatting of text strings and determination and location of substrings within strings. */
declare var String: StringConstructor;

interface Boolean {
    /** Returns the primitive value of the specified object. */
    valueOf(): boolean;
}

interface BooleanConstructor {
    new (value?: any): Boolean;
    <T>(value?: T): boolean;
    readonly prototype: Boolean;
}

declare var Boolean: BooleanConstructor;

interface Number {
    /**
     * Returns a string representation of an object.
     * @param radix Specifies a radix for converting numeric values to strings. This value is only used for numbers.
     */
    toString(radix?: number): string;
    /**
     * Returns a string representing a number in fixed-point notation.
     * @param fractionDigits Number of digits after the decimal point. Must be in the range 0 - 20, inclusive.
     */
    toFixed(fractionDigits?: number): string;
    toExponential(fractionDigits?: number): string;
    toPrecision(precision?: number): string;
    toLocaleString(): string;
    /** Returns the primitive value of the specified object. */
    valueOf(): number;
}

interface NumberConstructor {
    new (value?: any): Number;
    (value?: any): number;
    readonly prototype: Number;
    /** The largest number that can be represented in JavaScript. */
    readonly MAX_VALUE: number;
    readonly MIN_VALUE: number;
    readonly MAX_SAFE_INTEGER: number;
    readonly MIN_SAFE_INTEGER: number;
    readonly EPSILON: number;
    readonly NaN: number;
    isFinite(number: unknown): boolean;
    isInteger(number: unknown): boolean;
    isNaN(number: unknown): boolean;
    isSafeInteger(number: unknown): boolean;
    parseFloat(string: string): number;
    parseInt(string: string, radix?: number): number;
}

/** An object that represents a number of any kind. All JavaScript numbers are 64-bit floating-point numbers. */
declare var Number: NumberConstructor;

interface BigInt {
    toString(radix?: number): string;
    toLocaleString(): string;
    valueOf(): bigint;
}

interface BigIntConstructor {
    (value: number | string | bigint | boolean): bigint;
    readonly prototype: BigInt;
}

declare var BigInt: BigIntConstructor;

interface Symbol {
    toString(): string;
    valueOf(): symbol;
    readonly description: string | undefined;
}

interface SymbolConstructor {
    (description?: string | number): symbol;
    readonly prototype: Symbol;
    readonly iterator: symbol;
    for(key: string): symbol;
}

declare var Symbol: SymbolConstructor;

interface RegExp {
    /**
     * Executes a search on a string using a regular expression pattern, and returns an array containing the results of that search.
     * @param string The String object or string literal on which to perform the search.
     */
    exec(string: string): RegExpExecArray | null;
    /**
     * Returns a Boolean value that indicates whether or not a pattern exists in a searched string.
     * @param string String on which to perform the search.
     */
    test(string: string): boolean;
    readonly source: string;
    readonly flags: string;
    readonly global: boolean;
    readonly ignoreCase: boolean;
    readonly multiline: boolean;
    lastIndex: number;
}

interface RegExpConstructor {
    new (pattern: RegExp | string, flags?: string): RegExp;
    (pattern: RegExp | string, flags?: string): RegExp;
    readonly prototype: RegExp;
}

declare var RegExp: RegExpConstructor;

interface RegExpMatchArray extends Array<string> {
    index?: number;
    input?: string;
}

interface RegExpExecArray extends Array<string> {
    index: number;
    input: string;
}

interface Array<T> {
    /** Gets or sets the length of the array. This is a number one higher than the highest index in the array. */
    length: number;
    /** Returns a string representation of an array. */
    toString(): string;
    toLocaleString(): string;
    /**
     * Removes the last element from an array and returns it.
     * If the array is empty, undefined is returned and the array is not modified.
     */
    pop(): T | undefined;
    /**
     * Appends new elements to the end of an array, and returns the new length of the array.
     * @param items New elements to add to the array.
     */
    push(...items: T[]): number;
    /**
     * Combines two or more arrays.
     * @param items Additional arrays and/or items to add to the end of the array.
     */
    concat(...items: T[][]): T[];
    /**
     * Adds all the elements of an array into a string, separated by the specified separator string.
     * @param separator A string used to separate one element of the array from the next in the resulting string. If omitted, the array elements are separated with a comma.
     */
    join(separator?: string): string;
    reverse(): T[];
    shift(): T | undefined;
    /**
     * Returns a copy of a section of an array.
     * @param start The beginning index of the specified portion of the array.
     * @param end The end index of the specified portion of the array. This is exclusive of the element at the index 'end'.
     */
    slice(start?: number, end?: number): T[];
    sort(compareFn?: (a: T, b: T) => number): T[];
    splice(start: number, deleteCount?: number, ...items: T[]): T[];
    unshift(...items: T[]): number;
    indexOf(searchElement: T, fromIndex?: number): number;
    lastIndexOf(searchElement: T, fromIndex?: number): number;
    includes(searchElement: T, fromIndex?: number): boolean;
    /**
     * Determines whether all the members of an array satisfy the specified test.
     * @param predicate A function that accepts up to three arguments. The every method calls the predicate function for each element in the array until the predicate returns a value which is coercible to the Boolean value false, or until the end of the array.
     */
    every(predicate: (value: T, index: number, array: T[]) => unknown): boolean;
    some(predicate: (value: T, index: number, array: T[]) => unknown): boolean;
    /**
     * Performs the specified action for each element in an array.
     * @param callbackfn A function that accepts up to three arguments. forEach calls the callbackfn function one time for each element in the array.
     */
    forEach(callbackfn: (value: T, index: number, array: T[]) => void): void;
    /**
     * Calls a defined callback function on each element of an array, and returns an array that contains the results.
     * @param callbackfn A function that accepts up to three arguments. The map method calls the callbackfn function one time for each element in the array.
     */
    map<U>(callbackfn: (value: T, index: number, array: T[]) => U): U[];
    /**
     * Returns the elements of an array that meet the condition specified in a callback function.
     * @param predicate A function that accepts up to three arguments. The filter method calls the predicate function one time for each element in the array.
     */
    filter(predicate: (value: T, index: number, array: T[]) => unknown): T[];
    reduce<U>(callbackfn: (previousValue: U, currentValue: T, currentIndex: number, array: T[]) => U, initialValue: U): U;
    find(predicate: (value: T, index: number, obj: T[]) => unknown): T | undefined;
    findIndex(predicate: (value: T, index: number, obj: T[]) => unknown): number;
    fill(value: T, start?: number, end?: number): T[];
    at(index: number): T | undefined;
    flat(): any[];
    [n: number]: T;
}

interface ArrayConstructor {
    new <T>(arrayLength?: number): T[];
    <T>(arrayLength?: number): T[];
    isArray(arg: any): boolean;
    from<T>(arrayLike: ArrayLike<T>): T[];
    of<T>(...items: T[]): T[];
    readonly prototype: any[];
}

declare var Array: ArrayConstructor;

interface ArrayLike<T> {
    readonly length: number;
    readonly [n: number]: T;
}

interface ReadonlyArray<T> {
    readonly length: number;
    toString(): string;
    indexOf(searchElement: T, fromIndex?: number): number;
    includes(searchElement: T, fromIndex?: number): boolean;
    join(separator?: string): string;
    slice(start?: number, end?: number): T[];
    forEach(callbackfn: (value: T, index: number, array: readonly T[]) => void): void;
    map<U>(callbackfn: (value: T, index: number, array: readonly T[]) => U): U[];
    filter(predicate: (value: T, index: number, array: readonly T[]) => unknown): T[];
    readonly [n: number]: T;
}

interface Promise<T> {
    /**
     * Attaches callbacks for the resolution and/or rejection of the Promise.
     * @param onfulfilled The callback to execute when the Promise is resolved.
     * @param onrejected The callback to execute when the Promise is rejected.
     * @returns A Promise for the completion of which ever callback is executed.
     */
    then<TResult>(onfulfilled?: (value: T) => TResult, onrejected?: (reason: any) => TResult): Promise<TResult>;
    /**
     * Attaches a callback for only the rejection of the Promise.
     * @param onrejected The callback to execute when the Promise is rejected.
     * @returns A Promise for the completion of the callback.
     */
    catch<TResult>(onrejected?: (reason: any) => TResult): Promise<T | TResult>;
    finally(onfinally?: () => void): Promise<T>;
}

interface PromiseConstructor {
    new <T>(executor: (resolve: (value: T) => void, reject: (reason?: any) => void) => void): Promise<T>;
    readonly prototype: Promise<any>;
    resolve<T>(value: T): Promise<T>;
    reject<T>(reason?: any): Promise<T>;
    all<T>(values: T[]): Promise<T[]>;
    race<T>(values: T[]): Promise<T>;
}

declare var Promise: PromiseConstructor;

interface Map<K, V> {
    clear(): void;
    delete(key: K): boolean;
    forEach(callbackfn: (value: V, key: K, map: Map<K, V>) => void): void;
    get(key: K): V | undefined;
    has(key: K): boolean;
    set(key: K, value: V): Map<K, V>;
    readonly size: number;
}

interface MapConstructor {
    new <K, V>(): Map<K, V>;
    readonly prototype: Map<any, any>;
}

declare var Map: MapConstructor;

interface Set<T> {
    add(value: T): Set<T>;
    clear(): void;
    delete(value: T): boolean;
    forEach(callbackfn: (value: T, value2: T, set: Set<T>) => void): void;
    has(value: T): boolean;
    readonly size: number;
}

interface SetConstructor {
    new <T>(values?: T[]): Set<T>;
    readonly prototype: Set<any>;
}

declare var Set: SetConstructor;

interface Date {
    /** Returns a string representation of a date. */
    toString(): string;
    toDateString(): string;
    toISOString(): string;
    /** Returns the stored time value in milliseconds since midnight, January 1, 1970 UTC. */
    getTime(): number;
    getFullYear(): number;
    getMonth(): number;
    getDate(): number;
    getDay(): number;
    getHours(): number;
    getMinutes(): number;
    getSeconds(): number;
    valueOf(): number;
}

interface DateConstructor {
    new (value?: number | string): Date;
    (): string;
    readonly prototype: Date;
    /** Returns the number of milliseconds elapsed since midnight, January 1, 1970 Universal Coordinated Time (UTC). */
    now(): number;
    parse(s: string): number;
}

declare var Date: DateConstructor;

interface Error {
    name: string;
    message: string;
    stack?: string;
}

interface ErrorConstructor {
    new (message?: string): Error;
    (message?: string): Error;
    readonly prototype: Error;
}

declare var Error: ErrorConstructor;
declare var TypeError: ErrorConstructor;
declare var RangeError: ErrorConstructor;

/** An intrinsic object that provides basic mathematics functionality and constants. */
interface Math {
    /** The mathematical constant e. This is Euler's number, the base of natural logarithms. */
    readonly E: number;
    /** Pi. This is the ratio of the circumference of a circle to its diameter. */
    readonly PI: number;
    readonly LN2: number;
    readonly SQRT2: number;
    /**
     * Returns the absolute value of a number (the value without regard to whether it is positive or negative).
     * For example, the absolute value of -5 is the same as the absolute value of 5.
     * @param x A numeric expression for which the absolute value is needed.
     */
    abs(x: number): number;
    ceil(x: number): number;
    floor(x: number): number;
    round(x: number): number;
    trunc(x: number): number;
    sign(x: number): number;
    /**
     * Returns the larger of a set of supplied numeric expressions.
     * @param values Numeric expressions to be evaluated.
     */
    max(...values: number[]): number;
    /**
     * Returns the smaller of a set of supplied numeric expressions.
     * @param values Numeric expressions to be evaluated.
     */
    min(...values: number[]): number;
    pow(x: number, y: number): number;
    /** Returns a pseudorandom number between 0 and 1. */
    random(): number;
    sqrt(x: number): number;
    log(x: number): number;
    sin(x: number): number;
    cos(x: number): number;
}

/** An intrinsic object that provides basic mathematics functionality and constants. */
declare var Math: Math;

interface JSON {
    /**
     * Converts a JavaScript Object Notation (JSON) string into an object.
     * @param text A valid JSON string.
     * @param reviver A function that transforms the results. This function is called for each member of the object.
     */
    parse(text: string, reviver?: (key: string, value: any) => any): any;
    /**
     * Converts a JavaScript value to a JavaScript Object Notation (JSON) string.
     * @param value A JavaScript value, usually an object or array, to be converted.
     * @param replacer A function that transforms the results.
     * @param space Adds indentation, white space, and line break characters to the return-value JSON text to make it easier to read.
     */
    stringify(value: any, replacer?: (key: string, value: any) => any, space?: string | number): string;
}

/** An intrinsic object that provides functions to convert JavaScript values to and from the JavaScript Object Notation (JSON) format. */
declare var JSON: JSON;

interface Console {
    assert(condition?: boolean, ...data: any[]): void;
    clear(): void;
    debug(...data: any[]): void;
    error(...data: any[]): void;
    info(...data: any[]): void;
    log(...data: any[]): void;
    table(tabularData?: any, properties?: string[]): void;
    trace(...data: any[]): void;
    warn(...data: any[]): void;
}

declare var console: Console;
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tsq_syntax::{NodeFlags, SourceFile};

    #[test]
    fn test_core_lib_parses_without_missing_names() {
        let source = SourceFile::parse(LIB_CORE.file_name, LIB_CORE.content);
        assert!(!source.is_external_module());
        let missing = (0..source.arena.len())
            .map(|i| tsq_syntax::NodeIndex(i as u32))
            .filter(|&n| source.arena.flags(n).contains(NodeFlags::MISSING))
            .count();
        assert_eq!(missing, 0, "core lib should parse cleanly");
    }

    #[test]
    fn test_get_lib() {
        assert_eq!(get_lib("core").map(|l| l.file_name), Some(LIB_FILE_NAME));
        assert!(get_lib("dom").is_none());
    }
}
